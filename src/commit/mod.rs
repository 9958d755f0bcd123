//! Commit message generation: prompt rendering, response cleanup and orchestration.

pub mod message;
pub mod normalize;
pub mod prompt;

pub use message::{GenerationRequest, Orchestrator, generate_with};
pub use normalize::normalize;
pub use prompt::{normalize_language, render};
