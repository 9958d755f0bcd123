//! Process environment lookups used for provider preconditions and auto-detection.

use std::path::PathBuf;

/// Read-only view of the process environment.
///
/// Provider construction and auto-detection only ever ask two questions:
/// "is this variable set" and "where is this executable". Routing them
/// through a trait lets tests describe an environment without touching
/// the real one.
pub trait Environment: Send + Sync {
    /// Value of an environment variable, `None` when unset or empty.
    fn var(&self, key: &str) -> Option<String>;

    /// Resolve an executable name on the search path.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }

    /// Uses the `which` crate for cross-platform executable detection.
    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}
