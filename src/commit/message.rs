//! End-to-end commit message generation: resolve, build, generate.

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::env::Environment;
use crate::error::GenerateError;
use crate::git::{StagedFile, format_staged_files};
use crate::llm::{CommitMessageGenerator, ProviderOptions, ResolvedProvider, build_generator};

/// Inputs for one generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub diff: String,
    pub branch: String,
    /// Prepended to the diff as a summary when non-empty.
    pub staged_files: Vec<StagedFile>,
    pub options: ProviderOptions,
}

/// Generates commit messages with a shared prompt configuration.
pub struct Orchestrator {
    config: Arc<Config>,
    env: Arc<dyn Environment>,
}

impl Orchestrator {
    pub fn new(config: Arc<Config>, env: Arc<dyn Environment>) -> Self {
        Self { config, env }
    }

    /// Apply detection and defaults to caller options.
    pub fn resolve(&self, options: &ProviderOptions) -> ResolvedProvider {
        options.resolve(self.env.as_ref())
    }

    /// Generate a commit message for the request.
    ///
    /// An empty diff is rejected before any provider is resolved or built.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerateError> {
        if request.diff.trim().is_empty() {
            return Err(GenerateError::NoDiff);
        }

        let resolved = self.resolve(&request.options);
        let generator = build_generator(&resolved, Arc::clone(&self.config), self.env.as_ref())
            .await
            .map_err(|source| GenerateError::Build {
                provider: resolved.provider,
                source,
            })?;

        generate_with(
            generator.as_ref(),
            &request.diff,
            &request.branch,
            &request.staged_files,
        )
        .await
    }
}

/// Run an already-built generator over the diff.
pub async fn generate_with(
    generator: &dyn CommitMessageGenerator,
    diff: &str,
    branch: &str,
    staged_files: &[StagedFile],
) -> Result<String, GenerateError> {
    if diff.trim().is_empty() {
        return Err(GenerateError::NoDiff);
    }

    let input = with_file_summary(diff, staged_files);
    debug!("Generating commit message (diff={} bytes, branch={})", input.len(), branch);

    generator
        .generate(&input, branch)
        .await
        .map_err(GenerateError::Provider)
}

fn with_file_summary(diff: &str, staged_files: &[StagedFile]) -> String {
    if staged_files.is_empty() {
        return diff.to_string();
    }
    format!(
        "Files changed:\n{}\n\nDiff:\n{}",
        format_staged_files(staged_files),
        diff
    )
}
