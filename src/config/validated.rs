//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::transport::{ClientConfig, HttpRequest, HttpResponse};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Canned response served instead of calling the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Status code of the canned response
    pub status: StatusCode,

    /// Body of the canned response
    pub body: Vec<u8>,

    /// Delay before the response is served
    pub delay: Duration,
}

impl MockConfig {
    /// Builds the canned response.
    #[must_use]
    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::new(self.status, HeaderMap::new(), self.body.clone())
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Request URL as given (absolute or relative to the base URL)
    pub url: String,

    /// HTTP method
    pub method: Method,

    /// Request body
    pub body: Option<Vec<u8>>,

    /// Transport defaults (base URL, timeout, headers)
    pub client: ClientConfig,

    /// Abort the request after this delay
    pub abort_after: Option<Duration>,

    /// Canned response, if mock mode is enabled
    pub mock: Option<MockConfig>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base_url = self
            .client
            .base_url
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        let abort_after = self
            .abort_after
            .map_or_else(|| "none".to_string(), |d| format!("{}ms", d.as_millis()));

        write!(
            f,
            "Config {{ url: {}, method: {}, base_url: {}, timeout: {}ms, headers: {}, \
             abort_after: {}, mock: {} }}",
            self.url,
            self.method,
            base_url,
            self.client.timeout.as_millis(),
            self.client.headers.len(),
            abort_after,
            self.mock.is_some(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL is missing, invalid, or relative without a base URL
    /// - The method, a header, or the mock status is invalid
    /// - The timeout or abort delay is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let client = Self::build_client(cli, toml)?;
        let url = Self::resolve_url(cli, toml, &client)?;
        let method = Self::resolve_method(cli, toml)?;

        let body = cli
            .data
            .clone()
            .or_else(|| toml.and_then(|t| t.request.body.clone()))
            .map(String::into_bytes);

        let abort_after = Self::resolve_abort_after(cli, toml)?;
        let mock = Self::resolve_mock(cli, toml)?;

        Ok(Self {
            url,
            method,
            body,
            client,
            abort_after,
            mock,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Builds the request described by this configuration.
    #[must_use]
    pub fn to_request(&self) -> HttpRequest {
        let request = HttpRequest::new(self.method.clone(), self.url.clone());
        match &self.body {
            Some(body) => request.with_body(body.clone()),
            None => request,
        }
    }

    fn build_client(cli: &Cli, toml: Option<&TomlConfig>) -> Result<ClientConfig, ConfigError> {
        let mut client = ClientConfig::new()
            .with_timeout(Self::resolve_timeout(cli, toml)?)
            .with_headers(Self::resolve_headers(cli, toml)?);

        let base_url = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.client.base_url.as_deref()));

        if let Some(base_url) = base_url {
            let parsed = Url::parse(base_url).map_err(|e| ConfigError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;
            client = client.with_base_url(parsed);
        }

        Ok(client)
    }

    fn resolve_url(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        client: &ClientConfig,
    ) -> Result<String, ConfigError> {
        let url = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set request.url in config file")
            })?;

        // Checked here so a bad URL is a configuration error, not a failed request
        client
            .resolve_url(url)
            .map_err(|e| ConfigError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(url.to_string())
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let method_str = cli
            .method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.request.method.as_deref()))
            .unwrap_or(defaults::METHOD);

        method_str
            .to_uppercase()
            .parse::<Method>()
            .map_err(|_| ConfigError::InvalidMethod(method_str.to_string()))
    }

    fn resolve_headers(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderMap, ConfigError> {
        let mut headers = ClientConfig::new().headers;

        // TOML headers first (CLI can override)
        if let Some(toml) = toml {
            for (name, value) in &toml.client.headers {
                let header_name = parse_header_name(name)?;
                let header_value = parse_header_value(name, value)?;
                headers.insert(header_name, header_value);
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            let header_name = parse_header_name(&name)?;
            let header_value = parse_header_value(&name, &value)?;
            headers.insert(header_name, header_value);
        }

        let bearer = cli
            .bearer
            .as_deref()
            .or_else(|| toml.and_then(|t| t.client.bearer.as_deref()));

        if let Some(token) = bearer {
            let auth_value = format!("Bearer {token}");
            let header_value = parse_header_value("Authorization", &auth_value)?;
            headers.insert(AUTHORIZATION, header_value);
        }

        Ok(headers)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let millis = cli
            .timeout_ms
            .or_else(|| toml.and_then(|t| t.client.timeout))
            .unwrap_or(defaults::TIMEOUT_MS);

        non_zero_millis("timeout", millis)
    }

    fn resolve_abort_after(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<Duration>, ConfigError> {
        cli.abort_after_ms
            .or_else(|| toml.and_then(|t| t.request.abort_after))
            .map(|millis| non_zero_millis("abort_after", millis))
            .transpose()
    }

    fn resolve_mock(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<MockConfig>, ConfigError> {
        let section = toml.map(|t| &t.mock);

        // Flags only enable, like every boolean switch here
        if !(cli.mock || section.is_some_and(|m| m.enabled)) {
            return Ok(None);
        }

        let code = cli
            .mock_status
            .or_else(|| section.and_then(|m| m.status))
            .unwrap_or(defaults::MOCK_STATUS);
        let status = StatusCode::from_u16(code).map_err(|_| ConfigError::InvalidStatus(code))?;

        let body = cli
            .mock_body
            .clone()
            .or_else(|| section.and_then(|m| m.body.clone()))
            .unwrap_or_default()
            .into_bytes();

        let delay = cli
            .mock_delay_ms
            .or_else(|| section.and_then(|m| m.delay))
            .map_or_else(defaults::mock_delay, Duration::from_millis);

        Ok(Some(MockConfig {
            status,
            body,
            delay,
        }))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn non_zero_millis(field: &'static str, millis: u64) -> Result<Duration, ConfigError> {
    if millis == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_millis(millis))
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_header_name(name: &str) -> Result<HeaderName, ConfigError> {
    name.parse::<HeaderName>()
        .map_err(|e| ConfigError::InvalidHeaderName {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
    HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeaderValue {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
