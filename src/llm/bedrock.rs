//! AWS Bedrock InvokeModel with an Anthropic model.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use tokio::time::timeout;
use tracing::debug;

use crate::error::ProviderError;

use super::content::{self, MessagesRequest};
use super::{CommitMessageGenerator, PromptSettings, Provider};

/// Region used when none is given.
pub const DEFAULT_REGION: &str = "us-east-1";

const BEDROCK_ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
const INVOKE_TIMEOUT_SECS: u64 = 120;

/// Bedrock runtime client bound to one model.
pub struct BedrockClient {
    client: Client,
    model_id: String,
    prompt: PromptSettings,
}

impl BedrockClient {
    /// Load the AWS configuration for `region`.
    ///
    /// Credentials come from the default provider chain and are resolved
    /// on first use, not here.
    pub async fn new(
        region: &str,
        model_id: String,
        prompt: PromptSettings,
    ) -> Result<Self, ProviderError> {
        let region = region.trim();
        if region.is_empty() {
            return Err(ProviderError::MissingRegion);
        }

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Ok(Self {
            client: Client::new(&sdk_config),
            model_id,
            prompt,
        })
    }
}

/// Serialize the InvokeModel body for a prompt.
fn request_body(prompt: &str) -> Result<Vec<u8>, ProviderError> {
    let mut request = MessagesRequest::user(prompt);
    request.anthropic_version = Some(BEDROCK_ANTHROPIC_VERSION);
    serde_json::to_vec(&request)
        .map_err(|e| ProviderError::InvokeFailed(format!("failed to serialize request: {}", e)))
}

#[async_trait]
impl CommitMessageGenerator for BedrockClient {
    async fn generate(&self, diff: &str, branch: &str) -> Result<String, ProviderError> {
        let prompt = self.prompt.render(branch, diff);
        let body = request_body(&prompt)?;

        debug!(
            "Invoking Bedrock model {} (prompt={} chars)",
            self.model_id,
            prompt.len()
        );

        let output = timeout(
            Duration::from_secs(INVOKE_TIMEOUT_SECS),
            self.client
                .invoke_model()
                .model_id(&self.model_id)
                .content_type("application/json")
                .accept("application/json")
                .body(Blob::new(body))
                .send(),
        )
        .await
        .map_err(|_| ProviderError::Timeout {
            provider: Provider::Bedrock,
            deadline: Duration::from_secs(INVOKE_TIMEOUT_SECS),
        })?
        .map_err(|e| ProviderError::InvokeFailed(DisplayErrorContext(&e).to_string()))?;

        let text = content::first_text(Provider::Bedrock, output.body().as_ref())?;
        self.prompt.normalize(Provider::Bedrock, &text)
    }
}
