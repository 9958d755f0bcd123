//! Provider selection, per-provider defaults and adapter construction.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::env::Environment;
use crate::error::ProviderError;

use super::anthropic::{self, AnthropicClient};
use super::bedrock::{self, BedrockClient};
use super::cli::{CliClient, CliTool};
use super::{CommitMessageGenerator, PromptSettings};

/// Supported text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// AWS Bedrock managed model API.
    Bedrock,
    /// Anthropic HTTP API.
    Claude,
    /// Claude Code CLI.
    ClaudeCode,
    /// GitHub Copilot CLI.
    CopilotCli,
    /// Gemini CLI.
    GeminiCli,
    /// OpenAI Codex CLI.
    CodexCli,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::Bedrock,
        Provider::Claude,
        Provider::ClaudeCode,
        Provider::CopilotCli,
        Provider::GeminiCli,
        Provider::CodexCli,
    ];

    /// Name used on the command line and in tool arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Bedrock => "bedrock",
            Provider::Claude => "claude",
            Provider::ClaudeCode => "claudecode",
            Provider::CopilotCli => "copilotcli",
            Provider::GeminiCli => "geminicli",
            Provider::CodexCli => "codexcli",
        }
    }

    /// Model used when none is given explicitly.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Bedrock => "anthropic.claude-sonnet-4-5-20250929-v1:0",
            Provider::Claude => "claude-sonnet-4-6",
            Provider::ClaudeCode => "claude-sonnet-4.5",
            Provider::CopilotCli => "claude-sonnet-4.5",
            Provider::GeminiCli => "gemini-2.5-pro",
            Provider::CodexCli => "o4-mini",
        }
    }

    /// Prompt language used when none is given explicitly.
    pub fn default_language(&self) -> &'static str {
        match self {
            Provider::Bedrock | Provider::Claude | Provider::CopilotCli | Provider::GeminiCli => {
                "ja"
            }
            Provider::ClaudeCode | Provider::CodexCli => "en",
        }
    }

    /// The local tool backing this provider, if it is a CLI provider.
    pub fn cli_tool(&self) -> Option<CliTool> {
        match self {
            Provider::Bedrock | Provider::Claude => None,
            Provider::ClaudeCode => Some(CliTool::ClaudeCode),
            Provider::CopilotCli => Some(CliTool::CopilotCli),
            Provider::GeminiCli => Some(CliTool::GeminiCli),
            Provider::CodexCli => Some(CliTool::CodexCli),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| ProviderError::UnknownProvider(s.to_string()))
    }
}

/// Pick a provider from what the environment offers.
///
/// Fixed priority, first match wins:
/// 1. `ANTHROPIC_API_KEY` set: Anthropic HTTP API
/// 2. `claude` on PATH: Claude Code CLI
/// 3. `copilot` on PATH: Copilot CLI
/// 4. `gemini` on PATH: Gemini CLI
/// 5. otherwise Bedrock, whose credentials are resolved lazily by the SDK
pub fn detect_provider(env: &dyn Environment) -> Provider {
    if env.var(anthropic::API_KEY_VAR).is_some() {
        return Provider::Claude;
    }

    for tool in [CliTool::ClaudeCode, CliTool::CopilotCli, CliTool::GeminiCli] {
        if env.find_executable(tool.executable()).is_some() {
            return tool.provider();
        }
    }

    Provider::Bedrock
}

/// Caller-supplied provider choices. Empty strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct ProviderOptions {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,
}

/// Provider choices with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub model: String,
    pub region: String,
    pub language: String,
}

impl ProviderOptions {
    /// Apply auto-detection and per-provider defaults.
    pub fn resolve(&self, env: &dyn Environment) -> ResolvedProvider {
        let provider = self.provider.unwrap_or_else(|| {
            let detected = detect_provider(env);
            debug!("Auto-detected provider: {}", detected);
            detected
        });

        ResolvedProvider {
            provider,
            model: non_empty(self.model.as_deref())
                .unwrap_or(provider.default_model())
                .to_string(),
            region: non_empty(self.region.as_deref())
                .unwrap_or(bedrock::DEFAULT_REGION)
                .to_string(),
            language: non_empty(self.language.as_deref())
                .unwrap_or(provider.default_language())
                .to_string(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the adapter for a resolved provider.
///
/// Fails here, before any prompt is built, when the provider's
/// precondition (API key, executable, region) is not met.
pub async fn build_generator(
    resolved: &ResolvedProvider,
    config: Arc<Config>,
    env: &dyn Environment,
) -> Result<Box<dyn CommitMessageGenerator>, ProviderError> {
    let prompt = PromptSettings::new(config, resolved.language.clone());
    let model = resolved.model.clone();

    debug!(
        "Building {} client (model={}, language={})",
        resolved.provider, model, resolved.language
    );

    match resolved.provider {
        Provider::Bedrock => {
            let client = BedrockClient::new(&resolved.region, model, prompt).await?;
            Ok(Box::new(client))
        }
        Provider::Claude => {
            let client = AnthropicClient::from_environment(env, model, prompt)?;
            Ok(Box::new(client))
        }
        Provider::ClaudeCode => locate(CliTool::ClaudeCode, env, model, prompt),
        Provider::CopilotCli => locate(CliTool::CopilotCli, env, model, prompt),
        Provider::GeminiCli => locate(CliTool::GeminiCli, env, model, prompt),
        Provider::CodexCli => locate(CliTool::CodexCli, env, model, prompt),
    }
}

fn locate(
    tool: CliTool,
    env: &dyn Environment,
    model: String,
    prompt: PromptSettings,
) -> Result<Box<dyn CommitMessageGenerator>, ProviderError> {
    let client = CliClient::locate(tool, env, model, prompt)?;
    Ok(Box::new(client))
}
