//! Provider adapters behind a single commit-message generation capability.

pub mod anthropic;
pub mod bedrock;
pub mod cli;
pub mod content;
pub mod provider;
pub mod subprocess;

use std::sync::Arc;

use async_trait::async_trait;

use crate::commit::{normalize, prompt};
use crate::config::Config;
use crate::error::ProviderError;

pub use anthropic::AnthropicClient;
pub use bedrock::BedrockClient;
pub use cli::{CliClient, CliTool};
pub use provider::{Provider, ProviderOptions, ResolvedProvider, build_generator, detect_provider};

/// Turn a diff and branch name into a candidate commit message.
///
/// Every provider implements this one method. Implementations are built
/// with their preconditions already checked, so a call only fails for
/// transport or response reasons.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitMessageGenerator: Send + Sync {
    async fn generate(&self, diff: &str, branch: &str) -> Result<String, ProviderError>;
}

/// Prompt configuration and language carried by every adapter.
#[derive(Debug, Clone)]
pub struct PromptSettings {
    pub config: Arc<Config>,
    pub language: String,
}

impl PromptSettings {
    pub fn new(config: Arc<Config>, language: impl Into<String>) -> Self {
        Self {
            config,
            language: language.into(),
        }
    }

    /// Render the prompt for this adapter's language.
    pub fn render(&self, branch: &str, diff: &str) -> String {
        prompt::render(&self.config, &self.language, branch, diff)
    }

    /// Normalize a raw response; empty output is an error.
    pub fn normalize(&self, provider: Provider, raw: &str) -> Result<String, ProviderError> {
        normalize::normalize(&self.config, raw).ok_or(ProviderError::EmptyResponse { provider })
    }
}
