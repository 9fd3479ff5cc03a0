//! Error types for HTTP operations.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
/// The request controller captures these into its observable `error`
/// field instead of propagating them.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid, or a relative URL was given
    /// without a base URL to resolve it against.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request was cancelled through its cancellation token.
    #[error("Request cancelled{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Cancelled {
        /// Message passed to the cancellation, if any
        message: Option<String>,
    },

    /// The response body could not be decoded into the expected type.
    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl HttpError {
    /// Creates a `Cancelled` error carrying the given message.
    #[must_use]
    pub const fn cancelled(message: Option<String>) -> Self {
        Self::Cancelled { message }
    }

    /// Returns true if this error was caused by cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
