//! Staged changes and branch information using git2.

use std::fmt;
use std::path::Path;

use git2::{Delta, Diff, DiffFindOptions, DiffFormat, ErrorCode, Repository, Tree};
use tracing::warn;

use crate::error::GitError;

/// Status of a staged file, as printed by `git diff --staged --name-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
}

impl FileStatus {
    pub fn code(&self) -> char {
        match self {
            FileStatus::Added => 'A',
            FileStatus::Modified => 'M',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Copied => 'C',
            FileStatus::TypeChanged => 'T',
        }
    }
}

/// A file with staged changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: String,
    pub status: FileStatus,
    /// Old path for renamed or copied files.
    pub old_path: Option<String>,
}

impl fmt::Display for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.old_path {
            Some(old) => write!(f, "{}\t{} -> {}", self.status.code(), old, self.path),
            None => write!(f, "{}\t{}", self.status.code(), self.path),
        }
    }
}

/// One `STATUS<TAB>path` line per file.
pub fn format_staged_files(files: &[StagedFile]) -> String {
    files
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Open the repository containing `path`.
pub fn open_repository(path: &Path) -> Result<Repository, GitError> {
    Repository::discover(path).map_err(GitError::OpenRepository)
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// so staged changes are diffed against the empty tree.
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// HEAD tree to index diff, with rename detection.
fn staged(repo: &Repository) -> Result<Diff<'_>, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    let mut diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let mut find = DiffFindOptions::new();
    find.renames(true);
    diff.find_similar(Some(&mut find))
        .map_err(GitError::DiffFailed)?;

    Ok(diff)
}

/// Unified diff of all staged changes, trimmed. Empty when nothing is staged.
pub fn staged_diff(repo: &Repository) -> Result<String, GitError> {
    let diff = staged(repo)?;
    let mut text = String::new();

    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        match std::str::from_utf8(line.content()) {
            Ok(content) => text.push_str(content),
            Err(_) => text.push_str(&String::from_utf8_lossy(line.content())),
        }
        true
    })
    .map_err(GitError::DiffFailed)?;

    Ok(text.trim().to_string())
}

/// Staged files with their status, in diff order.
pub fn staged_files(repo: &Repository) -> Result<Vec<StagedFile>, GitError> {
    let diff = staged(repo)?;
    let mut files = Vec::new();

    for delta in diff.deltas() {
        let status = match delta.status() {
            Delta::Added => FileStatus::Added,
            Delta::Modified => FileStatus::Modified,
            Delta::Deleted => FileStatus::Deleted,
            Delta::Renamed => FileStatus::Renamed,
            Delta::Copied => FileStatus::Copied,
            Delta::Typechange => FileStatus::TypeChanged,
            other => {
                warn!("Unexpected staged delta status: {:?}", other);
                FileStatus::Modified
            }
        };

        let new_path = delta
            .new_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());
        let old_path = delta
            .old_file()
            .path()
            .map(|p| p.to_string_lossy().to_string());

        let (path, old_path) = match status {
            FileStatus::Renamed | FileStatus::Copied => {
                (new_path.clone().or(old_path.clone()).unwrap_or_default(), old_path)
            }
            _ => (new_path.or(old_path).unwrap_or_default(), None),
        };

        if !path.is_empty() {
            files.push(StagedFile {
                path,
                status,
                old_path,
            });
        }
    }

    Ok(files)
}

/// Short name of the current branch.
///
/// On an unborn branch the name comes from the symbolic HEAD; a detached
/// HEAD yields `"HEAD"`.
pub fn current_branch(repo: &Repository) -> Result<String, GitError> {
    match repo.head() {
        Ok(head) => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            let head = repo
                .find_reference("HEAD")
                .map_err(GitError::BranchFailed)?;
            let target = head.symbolic_target().unwrap_or("HEAD");
            Ok(target
                .strip_prefix("refs/heads/")
                .unwrap_or(target)
                .to_string())
        }
        Err(e) => Err(GitError::BranchFailed(e)),
    }
}
