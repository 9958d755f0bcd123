//! Model Context Protocol server exposing staged-change and commit tools.

pub mod protocol;
pub mod server;
pub mod tools;

pub use protocol::{Request, Response, ToolResult};
pub use server::Server;
pub use tools::ToolHandler;
