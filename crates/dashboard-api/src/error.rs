//! Error types for the dashboard-api crate.

use thiserror::Error;

/// Errors that can occur when talking to the dashboard backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status code.
    #[error("Backend returned HTTP {0}")]
    Status(u16),

    /// The backend reported a failure in an `{"error": ...}` body.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The configured base URL cannot be used.
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}
