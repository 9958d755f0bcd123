//! Commits via the system git binary.
//!
//! Committing through `git` rather than git2 keeps hooks, signing and the
//! user's identity configuration in effect.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::GitError;

/// Run `git commit -m <message>` in `workdir` and return git's output.
pub fn commit(workdir: &Path, message: &str) -> Result<String, GitError> {
    debug!("Committing in {} ({} chars)", workdir.display(), message.len());
    run_git(workdir, &["commit", "-m", message], "commit")
}

/// Run a git command in `workdir`, returning combined stdout and stderr.
fn run_git(workdir: &Path, args: &[&str], operation: &str) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .map_err(|source| GitError::SpawnFailed {
            operation: operation.to_string(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let detail = if stderr.trim().is_empty() {
            stdout.trim()
        } else {
            stderr.trim()
        };
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: detail.to_string(),
        });
    }

    Ok(format!("{}{}", stdout, stderr).trim().to_string())
}
