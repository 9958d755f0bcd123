//! The five git and commit-message tools exposed to MCP clients.

use std::path::PathBuf;
use std::str::FromStr;

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::commit::{GenerationRequest, Orchestrator};
use crate::error::ToolError;
use crate::git::{self, StagedFile};
use crate::llm::{Provider, ProviderOptions};

use super::protocol::ToolResult;

const PROVIDER_DESCRIPTION: &str = "AI provider to use (bedrock, claude, claudecode, copilotcli, geminicli, codexcli). If not specified, auto-detected.";
const MODEL_DESCRIPTION: &str =
    "Model ID to use. If not specified, uses default for the provider.";

/// Staged diff, branch and file list read in one pass.
struct StagedContext {
    diff: String,
    branch: String,
    files: Vec<StagedFile>,
}

/// Tool dispatcher bound to a repository and server-level defaults.
pub struct ToolHandler {
    orchestrator: Orchestrator,
    defaults: ProviderOptions,
    workdir: PathBuf,
}

impl ToolHandler {
    pub fn new(orchestrator: Orchestrator, defaults: ProviderOptions, workdir: PathBuf) -> Self {
        Self {
            orchestrator,
            defaults,
            workdir,
        }
    }

    /// Tool definitions for `tools/list`.
    pub fn definitions() -> Value {
        let generation_schema = json!({
            "type": "object",
            "properties": {
                "provider": { "type": "string", "description": PROVIDER_DESCRIPTION },
                "model": { "type": "string", "description": MODEL_DESCRIPTION },
            },
        });

        json!([
            {
                "name": "get_staged_diff",
                "description": "Get the diff of all staged changes in the current git repository",
                "inputSchema": { "type": "object", "properties": {} },
            },
            {
                "name": "get_staged_files",
                "description": "Get the list of staged files with their status (Added/Modified/Deleted)",
                "inputSchema": { "type": "object", "properties": {} },
            },
            {
                "name": "generate_commit_message",
                "description": "Generate a commit message for staged changes using AI",
                "inputSchema": generation_schema,
            },
            {
                "name": "commit",
                "description": "Create a git commit with the specified message",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string", "description": "The commit message to use" },
                    },
                    "required": ["message"],
                },
            },
            {
                "name": "generate_and_commit",
                "description": "Generate a commit message using AI and create a commit with it",
                "inputSchema": generation_schema,
            },
        ])
    }

    /// Run a tool. Failures become error results, never protocol errors.
    pub async fn call(&self, name: &str, arguments: &Value) -> ToolResult {
        debug!("Tool call: {}", name);
        match self.dispatch(name, arguments).await {
            Ok(text) => ToolResult::text(text),
            Err(e) => {
                info!("Tool {} failed: {}", name, e);
                ToolResult::error(e.to_string())
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: &Value) -> Result<String, ToolError> {
        match name {
            "get_staged_diff" => self.get_staged_diff(),
            "get_staged_files" => self.get_staged_files(),
            "generate_commit_message" => self.generate_commit_message(arguments).await,
            "commit" => self.commit(arguments),
            "generate_and_commit" => self.generate_and_commit(arguments).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }

    fn get_staged_diff(&self) -> Result<String, ToolError> {
        let repo = git::open_repository(&self.workdir)?;
        let diff = git::staged_diff(&repo)?;
        if diff.is_empty() {
            return Ok(ToolError::NothingStaged.to_string());
        }
        Ok(diff)
    }

    fn get_staged_files(&self) -> Result<String, ToolError> {
        let repo = git::open_repository(&self.workdir)?;
        let files = git::staged_files(&repo)?;
        if files.is_empty() {
            return Ok("No staged files found.".to_string());
        }
        Ok(git::format_staged_files(&files))
    }

    async fn generate_commit_message(&self, arguments: &Value) -> Result<String, ToolError> {
        let options = self.options(arguments)?;
        let context = self.staged_context()?;
        self.generate(context, options).await
    }

    fn commit(&self, arguments: &Value) -> Result<String, ToolError> {
        let message = string_arg(arguments, "message").ok_or(ToolError::MissingMessage)?;

        // Staged state may have changed since the message was generated.
        let repo = git::open_repository(&self.workdir)?;
        if git::staged_diff(&repo)?.is_empty() {
            return Err(ToolError::NothingStaged);
        }

        let output = git::commit(&self.workdir, message)?;
        Ok(format!("Commit created successfully:\n{}", output))
    }

    async fn generate_and_commit(&self, arguments: &Value) -> Result<String, ToolError> {
        let options = self.options(arguments)?;
        let context = self.staged_context()?;
        let message = self.generate(context, options).await?;

        let output = git::commit(&self.workdir, &message).map_err(|source| {
            ToolError::CommitGenerated {
                message: message.clone(),
                source,
            }
        })?;

        Ok(format!(
            "Commit created with message:\n{}\n\nOutput:\n{}",
            message, output
        ))
    }

    async fn generate(
        &self,
        context: StagedContext,
        options: ProviderOptions,
    ) -> Result<String, ToolError> {
        let request = GenerationRequest {
            diff: context.diff,
            branch: context.branch,
            staged_files: context.files,
            options,
        };
        Ok(self.orchestrator.generate(&request).await?)
    }

    fn staged_context(&self) -> Result<StagedContext, ToolError> {
        let repo = git::open_repository(&self.workdir)?;
        let diff = git::staged_diff(&repo)?;
        if diff.is_empty() {
            return Err(ToolError::NothingStaged);
        }

        Ok(StagedContext {
            branch: git::current_branch(&repo)?,
            files: git::staged_files(&repo)?,
            diff,
        })
    }

    /// Per-call provider and model, falling back to the server defaults.
    fn options(&self, arguments: &Value) -> Result<ProviderOptions, ToolError> {
        let mut options = self.defaults.clone();
        if let Some(name) = string_arg(arguments, "provider") {
            options.provider = Some(Provider::from_str(name)?);
        }
        if let Some(model) = string_arg(arguments, "model") {
            options.model = Some(model.to_string());
        }
        Ok(options)
    }
}

/// A non-empty string argument.
fn string_arg<'a>(arguments: &'a Value, name: &str) -> Option<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
