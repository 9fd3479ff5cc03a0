//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Transport defaults
    #[serde(default)]
    pub client: ClientSection,

    /// The request to issue
    #[serde(default)]
    pub request: RequestSection,

    /// Canned response settings
    #[serde(default)]
    pub mock: MockSection,
}

/// Transport configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Base URL for relative request URLs
    pub base_url: Option<String>,

    /// Timeout in milliseconds (default: 5000)
    pub timeout: Option<u64>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Bearer token for Authorization header
    pub bearer: Option<String>,
}

/// Request configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSection {
    /// Request URL
    pub url: Option<String>,

    /// HTTP method (default: GET)
    pub method: Option<String>,

    /// Request body
    pub body: Option<String>,

    /// Abort the request after this many milliseconds
    pub abort_after: Option<u64>,
}

/// Canned response configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockSection {
    /// Serve the canned response instead of calling the server
    #[serde(default)]
    pub enabled: bool,

    /// Delay in milliseconds (default: 2000)
    pub delay: Option<u64>,

    /// Status code (default: 200)
    pub status: Option<u16>,

    /// Response body
    pub body: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# reactive-http Configuration File

[client]
# Base URL that relative request URLs are joined onto
# base_url = "https://api.example.com/"

# Timeout in milliseconds (default: 5000)
timeout = 5000

# Headers sent with every request.
# Accept and Content-Type default to application/json.
# [client.headers]
# X-Custom-Header = "value"

# Bearer token for Authorization header
# bearer = "your-token-here"

[request]
# Request URL, absolute or relative to client.base_url (required)
# url = "users/1"

# HTTP method (default: GET, can be overridden by --method CLI flag)
# method = "GET"

# Request body
# body = '{"name": "ferris"}'

# Abort the request after this many milliseconds
# abort_after = 1000

[mock]
# Serve a canned response instead of calling the server
# enabled = false

# Delay before the canned response is served, in milliseconds (default: 2000)
# delay = 2000

# Status code of the canned response (default: 200)
# status = 200

# Body of the canned response
# body = '{"ok": true}'
"#
    .to_string()
}
