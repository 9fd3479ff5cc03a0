//! Transport layer for issuing HTTP requests.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`], [`ClientConfig`])
//! - Cancelling in-flight requests ([`CancelSource`], [`CancelToken`])

mod cancel;
mod client;
mod error;
mod http;


pub use cancel::{CancelSource, CancelToken};
pub use client::{ClientConfig, ReqwestClient};
pub use error::HttpError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
