//! gcm - Generate git commit messages from staged changes using AI providers.
//!
//! # Overview
//!
//! gcm reads the staged diff and current branch, renders a prompt from a
//! YAML template, sends it to one of several providers (AWS Bedrock, the
//! Anthropic API, or a local AI CLI) and cleans up the reply into a
//! Semantic Release style commit message. The same capability is exposed
//! to MCP clients by the `gcm-mcp-server` binary.

pub mod commit;
pub mod config;
pub mod env;
pub mod error;
pub mod git;
pub mod llm;
pub mod mcp;

// Re-export commonly used types
pub use commit::{GenerationRequest, Orchestrator};
pub use config::{CommitPrefix, Config, PromptTemplate};
pub use env::{Environment, SystemEnvironment};
pub use error::{ConfigError, GenerateError, GitError, ProviderError, ToolError};
pub use llm::{CommitMessageGenerator, Provider, ProviderOptions, ResolvedProvider};
