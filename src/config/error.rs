//! Errors raised while turning CLI flags and the TOML file into a request.

use std::path::PathBuf;

use thiserror::Error;

/// Why a request could not be configured.
///
/// Everything here is reported before any network traffic happens and
/// maps to the configuration exit code.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The `--config` file exists on the command line but cannot be opened.
    #[error("Cannot read request config '{}': {source}", path.display())]
    FileRead {
        /// File given with `--config`
        path: PathBuf,
        /// I/O failure from the read
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unknown keys.
    #[error("Request config is not valid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// `init` could not write the template.
    #[error("Cannot write config template to '{}': {source}", path.display())]
    FileWrite {
        /// Output path passed to `init`
        path: PathBuf,
        /// I/O failure from the write
        #[source]
        source: std::io::Error,
    },

    /// Neither the CLI nor `[request]` supplied a value the request needs.
    #[error("No {field} to request. {hint}")]
    MissingRequired {
        /// One of the names in [`field`]
        field: &'static str,
        /// Where the value can be given
        hint: &'static str,
    },

    /// Request URL or `base_url` cannot be parsed or joined.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as written
        url: String,
        /// Parser message
        reason: String,
    },

    /// A timeout or delay of zero milliseconds.
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Option the duration came from
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Method name is not a valid HTTP token.
    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    /// `[mock] status` outside the three-digit range.
    #[error("Invalid mock status {0}: expected 100-999")]
    InvalidStatus(u16),

    /// A `--header` entry without a separator.
    #[error("Invalid header '{value}': expected 'Name=Value' or 'Name: Value'")]
    InvalidHeader {
        /// Entry as written
        value: String,
    },

    #[error("Invalid header name '{name}': {reason}")]
    InvalidHeaderName {
        name: String,
        reason: String,
    },

    #[error("Invalid value for header '{name}': {reason}")]
    InvalidHeaderValue {
        name: String,
        reason: String,
    },
}

/// Names reported by [`ConfigError::MissingRequired`].
pub mod field {
    /// Request URL, from `--url` or `[request] url`.
    pub const URL: &str = "url";
}

impl ConfigError {
    /// Shorthand for [`ConfigError::MissingRequired`].
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
