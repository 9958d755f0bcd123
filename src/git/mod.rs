//! Git repository access for staged changes and commits.

pub mod executor;
pub mod staged;

pub use executor::commit;
pub use staged::{
    FileStatus, StagedFile, current_branch, format_staged_files, open_repository, staged_diff,
    staged_files,
};
