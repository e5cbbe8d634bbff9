//! Shared plumbing for MCP servers.
//!
//! - `init` - tracing setup and the `serve_stdio!` startup macro
//! - `result` - helpers for building `CallToolResult` responses
//! - `error` - conversions from library errors to MCP errors

pub mod error;
pub mod init;
pub mod result;

pub use error::{internal_error, invalid_params, IntoMcpError, ResultExt};
pub use init::init_tracing;
pub use result::json_success;

// Commonly needed rmcp types, re-exported so server crates only name one dep
pub use rmcp::{model::CallToolResult, ErrorData as McpError};
