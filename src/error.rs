//! Error types for gcm modules using thiserror.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::llm::Provider;

/// Errors from loading or writing the prompt configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[source] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Config file already exists: {0} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Failed to write config file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to collect staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to resolve current branch: {0}")]
    BranchFailed(#[source] git2::Error),

    #[error("Failed to run git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Errors from provider construction and text generation.
///
/// Precondition variants are only produced while building an adapter;
/// the remaining variants come from a `generate` call.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown provider '{0}'. Must be one of: bedrock, claude, claudecode, copilotcli, geminicli, codexcli")]
    UnknownProvider(String),

    #[error("{var} environment variable is not set")]
    MissingApiKey { var: &'static str },

    #[error("{executable} command not found in PATH (required by the {provider} provider)")]
    NotInstalled {
        provider: Provider,
        executable: &'static str,
    },

    #[error("AWS region must not be empty")]
    MissingRegion,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed to send request to {provider}: {source}")]
    Http {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API request failed with status {status}: {body}")]
    HttpStatus {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("Failed to invoke Bedrock model: {0}")]
    InvokeFailed(String),

    #[error("{provider} returned an invalid response: {reason}")]
    InvalidResponse { provider: Provider, reason: String },

    #[error("No content in {provider} response")]
    EmptyContent { provider: Provider },

    #[error("Empty response from {provider}")]
    EmptyResponse { provider: Provider },

    #[error("Failed to spawn {executable}: {source}")]
    SpawnFailed {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{executable} exited with code {code}: {stderr}")]
    NonZeroExit {
        executable: String,
        code: i32,
        stderr: String,
    },

    #[error("{provider} timed out after {deadline:?}")]
    Timeout { provider: Provider, deadline: Duration },
}

/// Errors from the end-to-end commit message generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No diff provided")]
    NoDiff,

    #[error("Failed to build {provider} client: {source}")]
    Build {
        provider: Provider,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to generate commit message: {0}")]
    Provider(#[source] ProviderError),
}

/// Errors surfaced by the remote-tool handlers.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("No staged changes found. Please stage your changes with 'git add' first.")]
    NothingStaged,

    #[error("Commit message is required")]
    MissingMessage,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Failed to commit generated message:\n{message}\n\nError: {source}")]
    CommitGenerated {
        message: String,
        #[source]
        source: GitError,
    },
}
