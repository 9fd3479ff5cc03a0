//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait that allows injecting instant
//! delays in tests while using the tokio timer in production.

use std::time::Duration;

/// Abstraction over asynchronous delays.
///
/// Used by the request controller to simulate transport latency in
/// [`request_mock`](crate::request::RequestController::request_mock).
///
/// # Example
///
/// ```
/// use reactive_http::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// InstantSleeper.sleep(Duration::from_secs(60)).await;
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Completes after `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
///
/// Honors tokio's paused clock, so tests can drive it with
/// `tokio::time::advance`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately regardless of the requested duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
