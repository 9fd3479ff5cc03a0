//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default HTTP method.
pub const METHOD: &str = "GET";

/// Default transport timeout in milliseconds.
pub const TIMEOUT_MS: u64 = 5000;

/// Default delay before a canned response is served, in milliseconds.
pub const MOCK_DELAY_MS: u64 = 2000;

/// Default status code of the canned response.
pub const MOCK_STATUS: u16 = 200;

/// Default transport timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_millis(TIMEOUT_MS)
}

/// Default mock delay as Duration.
#[must_use]
pub const fn mock_delay() -> Duration {
    Duration::from_millis(MOCK_DELAY_MS)
}
