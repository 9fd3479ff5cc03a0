//! Observable request state.

use std::fmt;
use std::sync::Arc;

use http::{HeaderMap, StatusCode};

use crate::reactive::Ref;
use crate::transport::{HttpError, HttpResponse};

use super::ResponseBody;

/// Where the controller is in its request cycle.
///
/// Exactly one phase applies at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request has been issued yet.
    Idle,
    /// A request is in flight.
    Loading,
    /// The most recent request settled (succeeded, failed or was aborted).
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Finished => write!(f, "finished"),
        }
    }
}

/// Observable fields describing the most recent request.
///
/// Every field is a [`Ref`]; cloning the state clones the handles, so a
/// clone observes and reads the same cells the controller writes.
///
/// Fields are written one at a time, so an `on_change` callback may see
/// `is_loading` and `is_finished` both true for the duration of a single
/// write at the start and end of a cycle. Observers that need a consistent
/// lifecycle view should read [`phase`](Self::phase), which is never
/// `Idle` once the first request has started.
pub struct RequestState<T> {
    /// Full response descriptor, present whenever a response was received
    pub response: Ref<Option<HttpResponse>>,
    /// Decoded response body
    pub data: Ref<Option<T>>,
    /// Transport failure, cancellation or decode error
    pub error: Ref<Option<Arc<HttpError>>>,
    /// Response headers
    pub headers: Ref<Option<HeaderMap>>,
    /// Response status code
    pub status: Ref<Option<StatusCode>>,
    /// Response status text
    pub status_text: Ref<Option<String>>,
    /// Message passed to the last accepted abort
    pub abort_message: Ref<Option<String>>,
    /// Set once an abort has cancelled the in-flight request
    pub aborted: Ref<bool>,
    /// True strictly between request start and settle.
    ///
    /// Briefly overlaps `is_finished` while the cycle flips; prefer
    /// [`RequestState::phase`] inside change callbacks.
    pub is_loading: Ref<bool>,
    /// True once the current request has settled.
    ///
    /// Raised before `is_loading` drops, see [`RequestState::phase`].
    pub is_finished: Ref<bool>,
    /// Failure status received, the body could not be decoded, or the
    /// transport failed
    pub has_failed: Ref<bool>,
    /// Non-failure status received
    pub is_successful: Ref<bool>,
}

impl<T> Clone for RequestState<T> {
    fn clone(&self) -> Self {
        Self {
            response: self.response.clone(),
            data: self.data.clone(),
            error: self.error.clone(),
            headers: self.headers.clone(),
            status: self.status.clone(),
            status_text: self.status_text.clone(),
            abort_message: self.abort_message.clone(),
            aborted: self.aborted.clone(),
            is_loading: self.is_loading.clone(),
            is_finished: self.is_finished.clone(),
            has_failed: self.has_failed.clone(),
            is_successful: self.is_successful.clone(),
        }
    }
}

impl<T: ResponseBody> Default for RequestState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ResponseBody> RequestState<T> {
    /// Creates a state with every field absent or false.
    #[must_use]
    pub fn new() -> Self {
        Self {
            response: Ref::new(None),
            data: Ref::new(None),
            error: Ref::new(None),
            headers: Ref::new(None),
            status: Ref::new(None),
            status_text: Ref::new(None),
            abort_message: Ref::new(None),
            aborted: Ref::new(false),
            is_loading: Ref::new(false),
            is_finished: Ref::new(false),
            has_failed: Ref::new(false),
            is_successful: Ref::new(false),
        }
    }

    /// Returns the current phase of the request cycle.
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_loading.get() {
            Phase::Loading
        } else if self.is_finished.get() {
            Phase::Finished
        } else {
            Phase::Idle
        }
    }

    /// Copies every field into a plain value.
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot<T> {
        StateSnapshot {
            phase: self.phase(),
            response: self.response.get(),
            data: self.data.get(),
            error: self.error.get(),
            headers: self.headers.get(),
            status: self.status.get(),
            status_text: self.status_text.get(),
            abort_message: self.abort_message.get(),
            aborted: self.aborted.get(),
            is_loading: self.is_loading.get(),
            is_finished: self.is_finished.get(),
            has_failed: self.has_failed.get(),
            is_successful: self.is_successful.get(),
        }
    }

    /// Clears the previous cycle and marks a new one as loading.
    pub(super) fn reset(&self) {
        self.response.set(None);
        self.data.set(None);
        self.error.set(None);
        self.headers.set(None);
        self.status.set(None);
        self.status_text.set(None);
        self.abort_message.set(None);
        self.has_failed.set(false);
        self.is_successful.set(false);
        self.aborted.set(false);
        self.is_loading.set(true);
        self.is_finished.set(false);
    }
}

impl<T: fmt::Debug> fmt::Debug for RequestState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestState")
            .field("status", &self.status)
            .field("data", &self.data)
            .field("error", &self.error)
            .field("is_loading", &self.is_loading)
            .field("is_finished", &self.is_finished)
            .field("has_failed", &self.has_failed)
            .field("is_successful", &self.is_successful)
            .field("aborted", &self.aborted)
            .finish_non_exhaustive()
    }
}

/// Plain copy of a [`RequestState`] at one point in time.
#[derive(Debug, Clone)]
pub struct StateSnapshot<T> {
    /// Phase derived from the loading/finished flags
    pub phase: Phase,
    /// See [`RequestState::response`]
    pub response: Option<HttpResponse>,
    /// See [`RequestState::data`]
    pub data: Option<T>,
    /// See [`RequestState::error`]
    pub error: Option<Arc<HttpError>>,
    /// See [`RequestState::headers`]
    pub headers: Option<HeaderMap>,
    /// See [`RequestState::status`]
    pub status: Option<StatusCode>,
    /// See [`RequestState::status_text`]
    pub status_text: Option<String>,
    /// See [`RequestState::abort_message`]
    pub abort_message: Option<String>,
    /// See [`RequestState::aborted`]
    pub aborted: bool,
    /// See [`RequestState::is_loading`]
    pub is_loading: bool,
    /// See [`RequestState::is_finished`]
    pub is_finished: bool,
    /// See [`RequestState::has_failed`]
    pub has_failed: bool,
    /// See [`RequestState::is_successful`]
    pub is_successful: bool,
}

impl<T> fmt::Display for StateSnapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self
            .status
            .map_or_else(|| "none".to_string(), |s| s.as_u16().to_string());

        write!(
            f,
            "State {{ phase: {}, status: {}, successful: {}, failed: {}, aborted: {}",
            self.phase, status, self.is_successful, self.has_failed, self.aborted,
        )?;
        if let Some(ref error) = self.error {
            write!(f, ", error: {error}")?;
        }
        write!(f, " }}")
    }
}
