//! reactive-http: observable HTTP request state
//!
//! A library that wraps an HTTP client so that the lifecycle of each
//! request (loading, success, failure, cancellation, response payload)
//! is exposed as observable values.

pub mod config;
pub mod reactive;
pub mod request;
pub mod time;
pub mod transport;
