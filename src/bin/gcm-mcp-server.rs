//! gcm-mcp-server - MCP server for generating commit messages using AI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gcm::commit::Orchestrator;
use gcm::config::Config;
use gcm::env::SystemEnvironment;
use gcm::llm::bedrock::DEFAULT_REGION;
use gcm::llm::{Provider, ProviderOptions};
use gcm::mcp::{Server, ToolHandler};

/// Serve the gcm tools to MCP clients over stdio.
#[derive(Parser, Debug)]
#[command(name = "gcm-mcp-server")]
#[command(about = "MCP server for generating commit messages using AI")]
#[command(version)]
#[command(after_help = "Available tools:\n  \
    get_staged_diff         - Get the diff of all staged changes\n  \
    get_staged_files        - Get the list of staged files with status\n  \
    generate_commit_message - Generate a commit message using AI\n  \
    commit                  - Create a git commit with a specified message\n  \
    generate_and_commit     - Generate a message and create a commit")]
struct Cli {
    /// Default AI provider (auto-detected if not specified)
    #[arg(long)]
    provider: Option<Provider>,

    /// Default model ID
    #[arg(long)]
    model: Option<String>,

    /// AWS region (for bedrock provider)
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,

    /// Path to prompt config file (uses embedded default if not specified)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prompt language: ja or en (default depends on provider)
    #[arg(long)]
    lang: Option<String>,

    /// Enable debug logging on stderr
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the protocol, so logs must stay on stderr.
    let default = if cli.verbose { "warn,gcm=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).context("Failed to initialize config")?;
    let workdir = std::env::current_dir().context("Failed to resolve working directory")?;

    let defaults = ProviderOptions {
        provider: cli.provider,
        model: cli.model,
        region: Some(cli.region),
        language: cli.lang,
    };
    let orchestrator = Orchestrator::new(Arc::new(config), Arc::new(SystemEnvironment));
    let server = Server::new(ToolHandler::new(orchestrator, defaults, workdir));

    server
        .serve_stdio()
        .await
        .context("Error running MCP server")
}
