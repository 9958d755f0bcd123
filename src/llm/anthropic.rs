//! Anthropic messages API over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::env::Environment;
use crate::error::ProviderError;

use super::content::{self, MessagesRequest};
use super::{CommitMessageGenerator, PromptSettings, Provider};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Anthropic API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    prompt: PromptSettings,
}

impl AnthropicClient {
    /// Build a client from `ANTHROPIC_API_KEY`. Fails fast when it is unset.
    pub fn from_environment(
        env: &dyn Environment,
        model: String,
        prompt: PromptSettings,
    ) -> Result<Self, ProviderError> {
        let api_key = env
            .var(API_KEY_VAR)
            .ok_or(ProviderError::MissingApiKey { var: API_KEY_VAR })?;
        Self::new(api_key, model, prompt)
    }

    pub fn new(api_key: String, model: String, prompt: PromptSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ProviderError::ClientBuild)?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            prompt,
        })
    }

    /// Point the client at a different server (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CommitMessageGenerator for AnthropicClient {
    async fn generate(&self, diff: &str, branch: &str) -> Result<String, ProviderError> {
        let prompt = self.prompt.render(branch, diff);

        let mut request = MessagesRequest::user(&prompt);
        request.model = Some(&self.model);

        debug!(
            "POST {}/v1/messages (model={}, prompt={} chars)",
            self.base_url,
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: Provider::Claude,
                source,
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| ProviderError::Http {
            provider: Provider::Claude,
            source,
        })?;

        if status != reqwest::StatusCode::OK {
            return Err(ProviderError::HttpStatus {
                provider: Provider::Claude,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).to_string(),
            });
        }

        let text = content::first_text(Provider::Claude, &body)?;
        self.prompt.normalize(Provider::Claude, &text)
    }
}
