//! Provider-specific error types

use thiserror::Error;

/// Errors that can occur while talking to the model server
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Network error (connection failed, DNS, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Server error (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid request (bad parameters)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response from API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not found or not loaded on the server
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Unknown error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Create from HTTP status code and body
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            400 => ProviderError::InvalidRequest(body.to_string()),
            404 => ProviderError::ModelNotFound(body.to_string()),
            500..=599 => ProviderError::ServerError(body.to_string()),
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}
