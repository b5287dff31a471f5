//! Polygon-specific error types.

use thiserror::Error;

use crate::application::ports::OptionsDataError;

/// Errors from the Polygon adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolygonError {
    /// Network error or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Authentication failed.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Resource not found.
    #[error("Not found: {resource}")]
    NotFound {
        /// Request path.
        resource: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<PolygonError> for OptionsDataError {
    fn from(err: PolygonError) -> Self {
        match err {
            PolygonError::Network(message) | PolygonError::InvalidUrl(message) => {
                Self::Connection { message }
            }
            PolygonError::Api { status, message } => Self::Api { status, message },
            PolygonError::AuthenticationFailed => Self::AuthenticationFailed,
            PolygonError::RateLimited => Self::RateLimited,
            PolygonError::NotFound { resource } => Self::NotFound { resource },
            PolygonError::JsonParse(message) => Self::Parse { message },
        }
    }
}
