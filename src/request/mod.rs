//! Request lifecycle as observable state.
//!
//! This module provides:
//! - The request controller ([`RequestController`]) with `request`,
//!   the per-method shorthands, `request_mock` and `abort`
//! - The observable state bundle ([`RequestState`], [`Phase`], [`StateSnapshot`])
//! - Response mapping ([`map_response`], [`MappedResponse`])
//! - Body decoding ([`ResponseBody`], [`Json`])
//! - Immediate and deferred request input ([`RequestInput`], [`DeferredRequest`], [`RequestOptions`])
//!
//! # Lifecycle
//!
//! `idle -> loading -> (successful | failed | aborted) -> finished`, where
//! `idle` only applies before the first request. A new request always
//! resets every field first.
//!
//! # Cancelled Requests
//!
//! A request cancelled through [`RequestController::abort`] settles with
//! `aborted = true`, `has_failed = true`, `is_successful = false` and a
//! cancellation error in `error`. Observers that want to tell an abort
//! apart from other failures check `aborted` first.

mod body;
mod controller;
mod input;
mod map;
mod state;


pub use body::{Json, ResponseBody};
pub use controller::RequestController;
pub use input::{DeferredRequest, RequestInput, RequestOptions};
pub use map::{FAILURE_STATUS, MappedResponse, map_response};
pub use state::{Phase, RequestState, StateSnapshot};
