//! gcm - CLI entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gcm::commit::{GenerationRequest, Orchestrator};
use gcm::config::{Config, DEFAULT_CONFIG_PATH};
use gcm::env::SystemEnvironment;
use gcm::git;
use gcm::llm::bedrock::DEFAULT_REGION;
use gcm::llm::{Provider, ProviderOptions};

/// Generate commit messages for staged changes using AI.
#[derive(Parser, Debug)]
#[command(name = "gcm")]
#[command(about = "Generate commit messages for staged changes using AI")]
#[command(
    after_help = "Providers (auto-detected when --provider is omitted):\n  \
    bedrock    - AWS Bedrock (requires AWS credentials)\n  \
    claude     - Claude API (requires ANTHROPIC_API_KEY)\n  \
    claudecode - Claude Code CLI (requires 'claude' in PATH)\n  \
    copilotcli - Copilot CLI (requires 'copilot' in PATH)\n  \
    geminicli  - Gemini CLI (requires 'gemini' in PATH)\n  \
    codexcli   - Codex CLI (requires 'codex' in PATH, never auto-detected)"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// AI provider (auto-detected if not specified)
    #[arg(long)]
    provider: Option<Provider>,

    /// Model ID (default depends on provider)
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

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default prompt config to a file for customization
    Init {
        /// Output file path
        #[arg(short = 'f', long = "file", default_value = DEFAULT_CONFIG_PATH)]
        file: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::Init { ref file, force }) => run_init(file, force),
        Some(Command::Version) => {
            println!("gcm version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => run_generate(&cli).await,
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,gcm=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_init(file: &Path, force: bool) -> Result<()> {
    let path = Config::write_default(file, force).context("Failed to initialize config")?;

    println!("✓ Config file created: {}", path.display());
    println!();
    println!("You can now:");
    println!("  1. Edit the config file to customize prompts");
    println!("  2. Use it with: gcm --config {}", path.display());
    Ok(())
}

async fn run_generate(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load prompt config")?;

    // Step 1: Collect staged changes
    let repo = git::open_repository(Path::new("."))
        .context("Not a git repository. Run gcm from within a git repository.")?;
    let diff = git::staged_diff(&repo).context("Failed to get staged diff")?;

    if diff.is_empty() {
        println!("No staged changes found. Please stage your changes with 'git add' first.");
        return Ok(());
    }

    let branch = git::current_branch(&repo).context("Failed to get current branch")?;
    let staged_files = git::staged_files(&repo).context("Failed to get staged files")?;
    drop(repo);

    // Step 2: Resolve provider and generate
    let orchestrator = Orchestrator::new(Arc::new(config), Arc::new(SystemEnvironment));
    let options = ProviderOptions {
        provider: cli.provider,
        model: cli.model.clone(),
        region: Some(cli.region.clone()),
        language: cli.lang.clone(),
    };
    let resolved = orchestrator.resolve(&options);
    let diff_size = diff.len();

    let request = GenerationRequest {
        diff,
        branch,
        staged_files,
        options,
    };
    let message = orchestrator
        .generate(&request)
        .await
        .context("Error generating commit message")?;

    if cli.verbose {
        println!("=== Debug Information ===");
        println!("Provider: {}", resolved.provider);
        println!("Model ID: {}", resolved.model);
        if resolved.provider == Provider::Bedrock {
            println!("Region: {}", resolved.region);
        }
        println!("Diff size: {} bytes", diff_size);
        println!("========================");
    }

    println!("{}", message);
    Ok(())
}
