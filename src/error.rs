//! Saucier error types

use crate::cache::StorageError;

/// Saucier error types
///
/// These never cross the public [`RecipeClient`](crate::RecipeClient)
/// boundary: every operation collapses failures into an empty value. They
/// are used internally, by the storage and config layers, and by
/// [`RecipeClientBuilder::build()`](crate::RecipeClientBuilder::build).
#[derive(Debug, thiserror::Error)]
pub enum SaucierError {
    // Network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timed out")]
    Timeout,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("not found: {0}")]
    NotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data error: {0}")]
    DataError(String),

    #[error("empty response")]
    EmptyResponse,

    // Local errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SaucierError {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Server errors (5xx), timeouts and connection-level failures are
    /// transient. Client errors (4xx), malformed payloads and local errors
    /// are permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            SaucierError::Http(_) | SaucierError::Timeout => true,
            SaucierError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SaucierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SaucierError::Timeout
        } else if err.is_decode() {
            SaucierError::DataError(err.to_string())
        } else {
            SaucierError::Http(err.to_string())
        }
    }
}

/// Result type alias for Saucier operations
pub type Result<T> = std::result::Result<T, SaucierError>;
