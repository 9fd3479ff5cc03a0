//! Request input: a ready request or one resolved later.

use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::transport::HttpRequest;

/// Request options without a URL, merged with a URL resolved later.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: http::Method,
    /// HTTP headers to send
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: http::Method::GET,
            headers: http::HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }
}

impl RequestOptions {
    /// Creates GET options with no headers or body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: http::Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What a deferred input resolves to.
#[derive(Debug, Clone)]
pub struct DeferredRequest {
    /// Target URL
    pub url: String,
    /// Everything else about the request
    pub options: RequestOptions,
}

impl DeferredRequest {
    /// Creates a deferred result for `url` with the given options.
    #[must_use]
    pub fn new(url: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            url: url.into(),
            options,
        }
    }

    /// Merges the URL into the options to form a concrete request.
    #[must_use]
    pub fn into_request(self) -> HttpRequest {
        let RequestOptions {
            method,
            headers,
            body,
            timeout,
        } = self.options;

        HttpRequest {
            method,
            url: self.url,
            headers,
            body,
            timeout,
            cancel_token: None,
        }
    }
}

/// Input accepted by [`RequestController::request`](super::RequestController::request).
///
/// Either a ready [`HttpRequest`] or a future that computes the target
/// asynchronously.
///
/// # Example
///
/// ```
/// use reactive_http::request::{DeferredRequest, RequestInput, RequestOptions};
/// use reactive_http::transport::HttpRequest;
///
/// let ready: RequestInput = HttpRequest::get("/users").into();
///
/// let deferred = RequestInput::deferred(async {
///     let id = 42; // e.g. looked up elsewhere
///     DeferredRequest::new(format!("/users/{id}"), RequestOptions::new())
/// });
/// # let _ = (ready, deferred);
/// ```
pub enum RequestInput {
    /// A request ready to send.
    Ready(HttpRequest),
    /// A request whose URL and options are still being computed.
    Deferred(BoxFuture<'static, DeferredRequest>),
}

impl RequestInput {
    /// Wraps a future resolving to `{url, options}`.
    pub fn deferred(
        future: impl std::future::Future<Output = DeferredRequest> + Send + 'static,
    ) -> Self {
        Self::Deferred(Box::pin(future))
    }

    /// Returns true for deferred inputs.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Produces the concrete request, awaiting a deferred input.
    pub async fn resolve(self) -> HttpRequest {
        match self {
            Self::Ready(request) => request,
            Self::Deferred(future) => future.await.into_request(),
        }
    }
}

impl From<HttpRequest> for RequestInput {
    fn from(request: HttpRequest) -> Self {
        Self::Ready(request)
    }
}

impl From<DeferredRequest> for RequestInput {
    fn from(deferred: DeferredRequest) -> Self {
        Self::Ready(deferred.into_request())
    }
}

impl fmt::Debug for RequestInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(request) => f.debug_tuple("Ready").field(request).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
