//! Request controller: drives one request cycle at a time and mirrors its
//! outcome into a [`RequestState`].

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::{CancelSource, CancelToken, HttpClient, HttpError, HttpRequest, HttpResponse};

use super::{RequestInput, RequestState, ResponseBody, map_response};

/// Exposes the lifecycle of HTTP requests as observable state.
///
/// Each call to [`request`](Self::request) starts a new cycle: the state is
/// reset, the request is handed to the transport with a fresh cancellation
/// token, and the outcome is mapped back into the state. Errors never
/// escape; inspect [`RequestState::has_failed`] and [`RequestState::error`].
///
/// Overlapping cycles on one controller are not serialized. A superseded
/// request still writes its outcome when it settles, so callers that issue
/// requests back to back must await each one if ordering matters.
///
/// # Type Parameters
///
/// - `C`: The transport
/// - `T`: The type response bodies decode into (defaults to [`serde_json::Value`])
/// - `S`: The sleeper used by [`request_mock`](Self::request_mock) (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use reactive_http::request::RequestController;
/// use reactive_http::transport::ReqwestClient;
///
/// # async fn example() {
/// let controller = RequestController::new(ReqwestClient::new());
/// let state = controller.state().clone();
/// let _watch = state.is_loading.on_change(|loading| println!("loading: {loading}"));
///
/// controller.get("https://api.example.com/users").await;
///
/// if state.is_successful.get() {
///     println!("{:?}", state.data.get());
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct RequestController<C, T = serde_json::Value, S = TokioSleeper> {
    client: C,
    sleeper: S,
    state: RequestState<T>,
    cancel: Mutex<CancelSource>,
    mock_delay: Duration,
}

impl<C: HttpClient> RequestController<C> {
    /// Creates a controller decoding bodies as JSON values.
    ///
    /// Uses [`TokioSleeper`] and the default mock delay.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_state(client, TokioSleeper, RequestState::new())
    }
}

impl<C, T: ResponseBody, S> RequestController<C, T, S> {
    /// Default delay of [`request_mock`](Self::request_mock) (2 seconds).
    pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(2000);

    fn with_state(client: C, sleeper: S, state: RequestState<T>) -> Self {
        Self {
            client,
            sleeper,
            state,
            cancel: Mutex::new(CancelSource::new()),
            mock_delay: Self::DEFAULT_MOCK_DELAY,
        }
    }

    /// Switches the body type, starting from a fresh state.
    #[must_use]
    pub fn decode_as<U: ResponseBody>(self) -> RequestController<C, U, S> {
        RequestController::with_state(self.client, self.sleeper, RequestState::new())
            .with_mock_delay(self.mock_delay)
    }

    /// Sets a custom sleeper for mock delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RequestController<C, T, S2> {
        RequestController {
            client: self.client,
            sleeper,
            state: self.state,
            cancel: self.cancel,
            mock_delay: self.mock_delay,
        }
    }

    /// Sets the delay used when [`request_mock`](Self::request_mock) is
    /// called without one.
    #[must_use]
    pub const fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }

    /// Returns the observable state.
    #[must_use]
    pub const fn state(&self) -> &RequestState<T> {
        &self.state
    }

    /// Returns the transport.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Returns the default mock delay.
    #[must_use]
    pub const fn mock_delay(&self) -> Duration {
        self.mock_delay
    }
}

impl<C: HttpClient, T: ResponseBody, S: Sleeper> RequestController<C, T, S> {
    /// Issues a request and mirrors its outcome into the state.
    ///
    /// The state is reset (and `is_loading` set) when this method is
    /// called, before the returned future is polled. The future resolves
    /// once the outcome has been written; it never fails.
    ///
    /// A cancellation token attached to `input` is replaced by the
    /// controller's own.
    pub fn request(
        &self,
        input: impl Into<RequestInput>,
    ) -> impl Future<Output = ()> + Send + '_ {
        let input = input.into();
        let token = self.begin_cycle();

        async move {
            let outcome = match resolve_or_cancel(input, &token).await {
                Some(request) if !token.is_cancelled() => {
                    tracing::debug!(method = %request.method, url = %request.url, "Sending request");
                    self.client
                        .request(request.with_cancel_token(token.clone()))
                        .await
                }
                // Aborted while the deferred input was resolving
                _ => Err(token.to_error()),
            };

            self.settle(outcome);
        }
    }

    /// Issues a GET request.
    pub fn get(&self, url: impl Into<String>) -> impl Future<Output = ()> + Send + '_ {
        self.request(HttpRequest::get(url))
    }

    /// Issues a HEAD request.
    pub fn head(&self, url: impl Into<String>) -> impl Future<Output = ()> + Send + '_ {
        self.request(HttpRequest::new(http::Method::HEAD, url))
    }

    /// Issues an OPTIONS request.
    pub fn options(&self, url: impl Into<String>) -> impl Future<Output = ()> + Send + '_ {
        self.request(HttpRequest::new(http::Method::OPTIONS, url))
    }

    /// Issues a DELETE request.
    pub fn remove(&self, url: impl Into<String>) -> impl Future<Output = ()> + Send + '_ {
        self.request(HttpRequest::new(http::Method::DELETE, url))
    }

    /// Issues a POST request with an optional body.
    pub fn post(
        &self,
        url: impl Into<String>,
        body: Option<Vec<u8>>,
    ) -> impl Future<Output = ()> + Send + '_ {
        self.request(with_optional_body(HttpRequest::post(url), body))
    }

    /// Issues a PUT request with an optional body.
    pub fn put(
        &self,
        url: impl Into<String>,
        body: Option<Vec<u8>>,
    ) -> impl Future<Output = ()> + Send + '_ {
        self.request(with_optional_body(
            HttpRequest::new(http::Method::PUT, url),
            body,
        ))
    }

    /// Issues a PATCH request with an optional body.
    pub fn patch(
        &self,
        url: impl Into<String>,
        body: Option<Vec<u8>>,
    ) -> impl Future<Output = ()> + Send + '_ {
        self.request(with_optional_body(
            HttpRequest::new(http::Method::PATCH, url),
            body,
        ))
    }

    /// Runs a request cycle that serves `response` instead of calling the
    /// transport.
    ///
    /// Waits `delay` (or the controller's mock delay) on the sleeper, then
    /// maps `response` exactly like a transport result. An
    /// [`abort`](Self::abort) during the wait settles the cycle as
    /// cancelled.
    pub fn request_mock(
        &self,
        input: impl Into<RequestInput>,
        response: HttpResponse,
        delay: Option<Duration>,
    ) -> impl Future<Output = ()> + Send + '_ {
        let input = input.into();
        let token = self.begin_cycle();
        let delay = delay.unwrap_or(self.mock_delay);

        async move {
            let Some(request) = resolve_or_cancel(input, &token).await else {
                self.settle(Err(token.to_error()));
                return;
            };
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                ?delay,
                "Serving mock response"
            );

            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => Err(token.to_error()),
                () = self.sleeper.sleep(delay) => Ok(response),
            };

            self.settle(outcome);
        }
    }

    /// Requests cancellation of the in-flight request.
    ///
    /// Does nothing unless a request is loading and has not been aborted
    /// yet. Otherwise records `message` in `abort_message` and cancels the
    /// current token; the terminal flags (`aborted`, `is_loading`,
    /// `is_finished`) are written when the request settles.
    pub fn abort(&self, message: Option<String>) {
        if !self.state.is_loading.get() || self.state.is_finished.get() {
            tracing::debug!("Abort ignored: no request in flight");
            return;
        }

        let source = self
            .cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if source.is_cancelled() {
            return;
        }

        tracing::debug!(message = message.as_deref(), "Aborting request");
        self.state.abort_message.set(message.clone());
        source.cancel(message);
    }

    /// Resets the state and installs a fresh cancellation source.
    fn begin_cycle(&self) -> CancelToken {
        let source = CancelSource::new();
        let token = source.token();
        *self.cancel.lock().unwrap_or_else(PoisonError::into_inner) = source;
        self.state.reset();
        token
    }

    /// Writes the outcome of a cycle into the state.
    fn settle(&self, outcome: Result<HttpResponse, HttpError>) {
        match outcome {
            Ok(response) => self.apply_response(response),
            Err(error) => self.apply_error(error),
        }

        self.state.is_finished.set(true);
        self.state.is_loading.set(false);
    }

    fn apply_response(&self, response: HttpResponse) {
        let mapped = map_response::<T>(&response);
        tracing::debug!(status = mapped.status.as_u16(), "Request settled");

        if let Some(error) = mapped.decode_error {
            tracing::debug!("Response body not decoded: {error}");
            self.state.error.set(Some(std::sync::Arc::new(error)));
        }

        self.state.status.set(Some(mapped.status));
        self.state.status_text.set(Some(mapped.status_text));
        self.state.headers.set(Some(mapped.headers));
        self.state.data.set(mapped.data);
        self.state.is_successful.set(mapped.is_successful);
        self.state.has_failed.set(mapped.has_failed);
        self.state.response.set(Some(response));
    }

    fn apply_error(&self, error: HttpError) {
        if error.is_cancelled() {
            tracing::debug!("Request aborted: {error}");
            self.state.aborted.set(true);
        } else {
            tracing::debug!("Request failed: {error}");
        }

        self.state.error.set(Some(std::sync::Arc::new(error)));
        self.state.has_failed.set(true);
    }
}

/// Resolves `input`, giving up as soon as `token` is cancelled.
///
/// Returns `None` when cancelled first, even if the input never resolves.
async fn resolve_or_cancel(input: RequestInput, token: &CancelToken) -> Option<HttpRequest> {
    tokio::select! {
        biased;
        () = token.cancelled() => None,
        request = input.resolve() => Some(request),
    }
}

fn with_optional_body(request: HttpRequest, body: Option<Vec<u8>>) -> HttpRequest {
    match body {
        Some(body) => request.with_body(body),
        None => request,
    }
}
