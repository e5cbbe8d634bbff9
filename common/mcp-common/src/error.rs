//! Conversions from library errors to MCP protocol errors.

use rmcp::ErrorData as McpError;

/// Convert an error into an MCP-compatible error.
///
/// Implement for library error types so handlers can use `?` and
/// [`ResultExt::to_mcp_err`].
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for std::io::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("IO error: {}", self), None)
    }
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(format!("JSON error: {}", self), None)
    }
}

impl IntoMcpError for anyhow::Error {
    fn into_mcp_error(self) -> McpError {
        McpError::internal_error(self.to_string(), None)
    }
}

/// Extension for `Result` so any error implementing [`IntoMcpError`]
/// converts with a single `to_mcp_err()` call.
pub trait ResultExt<T> {
    fn to_mcp_err(self) -> Result<T, McpError>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> Result<T, McpError> {
        self.map_err(|e| e.into_mcp_error())
    }
}

/// Internal error with a message.
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// Invalid-params error, for rejected tool input.
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}
