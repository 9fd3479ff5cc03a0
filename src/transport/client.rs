//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use http::HeaderMap;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use url::Url;

use super::{CancelToken, HttpClient, HttpError, HttpRequest, HttpResponse};

/// Transport-wide defaults applied to every request.
///
/// Built once at application bootstrap and handed to [`ReqwestClient`];
/// there is no shared global configuration to mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL that relative request URLs are joined onto
    pub base_url: Option<Url>,
    /// Timeout used when a request does not set its own
    pub timeout: Duration,
    /// Headers sent with every request unless the request overrides them
    pub headers: HeaderMap,
}

impl ClientConfig {
    /// Default request timeout (5 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

    /// Creates a configuration with default timeout and JSON headers.
    #[must_use]
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Self {
            base_url: None,
            timeout: Self::DEFAULT_TIMEOUT,
            headers,
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the default timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the default headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Resolves a request URL against the base URL.
    ///
    /// Absolute URLs are used as-is. Relative URLs require a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidUrl`] if the URL cannot be parsed or
    /// is relative with no base URL configured.
    pub fn resolve_url(&self, url: &str) -> Result<Url, HttpError> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_ref().ok_or_else(|| {
                    HttpError::InvalidUrl(format!("relative URL '{url}' without a base URL"))
                })?;
                base.join(url)
                    .map_err(|e| HttpError::InvalidUrl(format!("{url}: {e}")))
            }
            Err(e) => Err(HttpError::InvalidUrl(format!("{url}: {e}"))),
        }
    }

    /// Merges default headers with request headers.
    ///
    /// A header name present on the request replaces every default value
    /// for that name.
    #[must_use]
    pub fn merge_headers(&self, request_headers: &HeaderMap) -> HeaderMap {
        let mut merged = self.headers.clone();
        for name in request_headers.keys() {
            merged.remove(name);
        }
        for (name, value) in request_headers {
            merged.append(name, value.clone());
        }
        merged
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Production HTTP client using reqwest.
///
/// This is a thin wrapper around `reqwest::Client` that implements
/// the [`HttpClient`] trait and applies a [`ClientConfig`]. Cloning is
/// cheap and clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use reactive_http::transport::{ClientConfig, HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new().with_base_url(Url::parse("https://api.example.com/")?);
/// let client = ReqwestClient::with_config(config);
/// let response = client.request(HttpRequest::get("users/1")).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestClient {
    /// Creates a new HTTP client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates an HTTP client applying the given defaults.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            inner: reqwest::Client::new(),
            config,
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom TLS or proxy configuration.
    #[must_use]
    pub const fn from_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            inner: client,
            config,
        }
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = self.config.resolve_url(&req.url)?;
        let headers = self.config.merge_headers(&req.headers);
        let timeout = req.timeout.unwrap_or(self.config.timeout);

        let mut builder = self
            .inner
            .request(req.method, url.as_str())
            .headers(headers)
            .timeout(timeout);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(map_reqwest_error)?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, mut req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let token = req.cancel_token.take();

        // Biased so an already-cancelled token never reaches the network.
        tokio::select! {
            biased;
            () = wait_cancelled(token.as_ref()) => Err(cancel_error(token.as_ref())),
            result = self.send(req) => result,
        }
    }
}

/// Completes when `token` is cancelled; never completes without a token.
async fn wait_cancelled(token: Option<&CancelToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

fn cancel_error(token: Option<&CancelToken>) -> HttpError {
    token.map_or_else(|| HttpError::cancelled(None), CancelToken::to_error)
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}
