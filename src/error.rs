//! Multiroute error types

use std::time::Duration;

/// Errors raised while talking to the inference backend.
///
/// Every variant is fatal to the request that produced it: the dispatcher
/// neither retries nor substitutes a fallback answer, and the HTTP layer
/// reports the `Display` text verbatim with a server-error status.
#[derive(Debug, thiserror::Error)]
pub enum MultirouteError {
    // Backend/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered, but not with something we can adapt.
    #[error("{0}")]
    MalformedOutput(String),

    #[error("empty response from model")]
    EmptyResponse,

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Opaque failure reported by a backend implementation.
    #[error("{0}")]
    Backend(String),
}

impl MultirouteError {
    /// Convenience constructor for [`MultirouteError::Backend`].
    pub fn backend(message: impl Into<String>) -> Self {
        MultirouteError::Backend(message.into())
    }
}

/// Result type alias for multiroute operations
pub type Result<T> = std::result::Result<T, MultirouteError>;
