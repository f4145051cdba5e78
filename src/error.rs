//! # Client Error Types
//!
//! Unified error handling for the taskq client library and CLI.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types for client operations
///
/// The variants keep "service unreachable", "service returned malformed data"
/// and "service has no result yet" apart so callers can react to each.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Missing field in response: {field}")]
    MissingField { field: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout waiting for operation: {operation} (after {attempts} attempts)")]
    Timeout { operation: String, attempts: u32 },

    #[error("Operation cancelled: {operation}")]
    Cancelled { operation: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ClientError {
    /// Create an API error from HTTP response
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a missing field error for a response that lacks an expected key
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Check if error is recoverable (worth polling again)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            ClientError::TransportError(e) => e.is_timeout() || e.is_connect(),
            ClientError::Timeout { .. } => true,
            ClientError::ApiError { status, .. } => *status >= 500,
            // A body that is not JSON means the service is broken, not busy
            ClientError::ParseError(_) => false,
            _ => false,
        }
    }
}
