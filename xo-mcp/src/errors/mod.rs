// Error handling module for the MCP server
//
// This module defines the error types used throughout the MCP server.

use thiserror::Error;

/// Errors raised by the server process itself (transport, startup)
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tool-specific errors
///
/// Every variant except `NotFound` is turned into a failure envelope at the
/// tool boundary; `NotFound` is reported to the host as a protocol error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool parameters: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error {status}: {body}")]
    Http {
        status: u16,
        body: String,
    },

    #[error("Request failed: {0}")]
    Transport(String),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        ToolError::Validation(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ToolError::Transport(message.into())
    }

    /// HTTP status code carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ToolError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ToolError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ToolError::Transport(format!("connection failed: {}", err))
        } else if err.is_decode() {
            ToolError::Transport(format!("malformed response body: {}", err))
        } else {
            ToolError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_only_for_http_errors() {
        let http = ToolError::Http { status: 404, body: "no such object".to_string() };
        assert_eq!(http.status_code(), Some(404));
        assert_eq!(ToolError::transport("boom").status_code(), None);
    }
}
