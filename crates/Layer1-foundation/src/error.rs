//! Error types for EmberCode
//!
//! Central taxonomy; each layer converts its own failures into this type at
//! the boundary where they stop being locally recoverable.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// EmberCode error type
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // Gateway / provider
    // ========================================================================
    #[error("Gateway error: {0}")]
    Gateway(String),

    // ========================================================================
    // Tools
    // ========================================================================
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution failed: {tool} - {message}")]
    ToolExecution { tool: String, message: String },

    // ========================================================================
    // Workspace
    // ========================================================================
    #[error("Workspace error: {0}")]
    Workspace(String),

    // ========================================================================
    // Execution
    // ========================================================================
    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Cancelled")]
    Cancelled,

    // ========================================================================
    // General
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // External error conversions
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check whether the error should be shown to the user as-is
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::NotFound(_)
                | Error::InvalidInput(_)
                | Error::Cancelled
        )
    }

    /// Tool execution error helper
    pub fn tool_execution(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ToolExecution {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}
