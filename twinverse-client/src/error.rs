//! Error types for the Twinverse client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the backend API.
///
/// These are transport and protocol failures. A job the backend itself
/// reports as `failed` is a normal terminal status, not a `ClientError`;
/// the distinction is what keeps "could not reach the service" from being
/// mistaken for "the AI job failed".
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (network, DNS, timeout)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Could not read a file destined for a multipart upload
    #[error("Failed to read upload {path}: {source}")]
    UploadRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}
