//! Cancellation tokens for in-flight requests.
//!
//! A [`CancelSource`] is created per request cycle; its [`CancelToken`]
//! travels with the [`HttpRequest`](super::HttpRequest) to the transport.
//! Cancelling the source wakes every clone of the token and records an
//! optional message that the transport reports back through
//! [`HttpError::Cancelled`](super::HttpError::Cancelled).

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

/// Owner side of a cancellation pair.
///
/// # Example
///
/// ```
/// use reactive_http::transport::CancelSource;
///
/// let source = CancelSource::new();
/// let token = source.token();
///
/// source.cancel(Some("user navigated away".to_string()));
///
/// assert!(token.is_cancelled());
/// assert_eq!(token.message(), Some("user navigated away"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelSource {
    token: CancelToken,
}

impl CancelSource {
    /// Creates a new, uncancelled source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a token observing this source.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Signals cancellation to every token of this source.
    ///
    /// Only the first call has an effect; later calls keep the
    /// original message.
    pub fn cancel(&self, message: Option<String>) {
        if self.token.message.set(message).is_ok() {
            self.token.inner.cancel();
        }
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Observer side of a cancellation pair, attached to a request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: CancellationToken,
    message: Arc<OnceLock<Option<String>>>,
}

impl CancelToken {
    /// Returns true if the owning source has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Completes when the owning source is cancelled.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }

    /// Returns the cancellation message, if cancelled with one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.get().and_then(Option::as_deref)
    }

    /// Builds the error a transport reports for this cancellation.
    #[must_use]
    pub fn to_error(&self) -> super::HttpError {
        super::HttpError::cancelled(self.message().map(ToString::to_string))
    }
}
