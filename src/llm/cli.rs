//! Local AI command-line tools as commit message generators.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::env::Environment;
use crate::error::ProviderError;

use super::subprocess::{Invocation, get_timeout, run_tool};
use super::{CommitMessageGenerator, PromptSettings, Provider};

/// The supported local tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliTool {
    ClaudeCode,
    CopilotCli,
    GeminiCli,
    CodexCli,
}

impl CliTool {
    pub fn provider(&self) -> Provider {
        match self {
            CliTool::ClaudeCode => Provider::ClaudeCode,
            CliTool::CopilotCli => Provider::CopilotCli,
            CliTool::GeminiCli => Provider::GeminiCli,
            CliTool::CodexCli => Provider::CodexCli,
        }
    }

    /// Executable name looked up on the search path.
    pub fn executable(&self) -> &'static str {
        match self {
            CliTool::ClaudeCode => "claude",
            CliTool::CopilotCli => "copilot",
            CliTool::GeminiCli => "gemini",
            CliTool::CodexCli => "codex",
        }
    }

    /// How the prompt and model are handed to the tool.
    ///
    /// Codex reads the prompt from standard input so large diffs do not
    /// hit argument length limits.
    pub fn invocation(&self, model: &str, prompt: &str) -> Invocation {
        let args: Vec<&str> = match self {
            CliTool::ClaudeCode => vec!["-p", prompt, "--model", model],
            CliTool::CopilotCli => vec!["-p", prompt, "--model", model],
            CliTool::GeminiCli => vec!["--model", model, "--prompt", prompt],
            CliTool::CodexCli => vec!["exec", "--model", model, "-"],
        };

        Invocation {
            args: args.into_iter().map(String::from).collect(),
            stdin: match self {
                CliTool::CodexCli => Some(prompt.to_string()),
                _ => None,
            },
        }
    }
}

/// A located CLI tool bound to a model.
pub struct CliClient {
    tool: CliTool,
    program: PathBuf,
    model: String,
    deadline: Duration,
    prompt: PromptSettings,
}

impl CliClient {
    /// Resolve the tool's executable. Fails when it is not on the search path.
    pub fn locate(
        tool: CliTool,
        env: &dyn Environment,
        model: String,
        prompt: PromptSettings,
    ) -> Result<Self, ProviderError> {
        let program =
            env.find_executable(tool.executable())
                .ok_or(ProviderError::NotInstalled {
                    provider: tool.provider(),
                    executable: tool.executable(),
                })?;

        debug!("Using {} at {}", tool.executable(), program.display());

        Ok(Self {
            tool,
            program,
            model,
            deadline: get_timeout(),
            prompt,
        })
    }

    /// Override the execution deadline.
    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

#[async_trait]
impl CommitMessageGenerator for CliClient {
    async fn generate(&self, diff: &str, branch: &str) -> Result<String, ProviderError> {
        let prompt = self.prompt.render(branch, diff);
        let invocation = self.tool.invocation(&self.model, &prompt);

        let stdout = run_tool(self.tool.provider(), &self.program, &invocation, self.deadline).await?;

        self.prompt.normalize(self.tool.provider(), &stdout)
    }
}
