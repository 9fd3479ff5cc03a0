//! Configuration layer for reactive-http.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`], [`MockConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! `url` has no default and must come from the CLI or the config file.
//!
//! # Headers
//!
//! Headers start from the transport defaults (`Accept` and `Content-Type`
//! set to `application/json`). TOML headers replace defaults of the same
//! name, CLI headers replace both, and a bearer token always sets
//! `Authorization`.
//!
//! # Boolean Flag Semantics
//!
//! `--mock` uses OR semantics: if set in either the CLI or `mock.enabled`,
//! mock mode is on. The CLI cannot switch it back off.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod toml_tests;

pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{MockConfig, ValidatedConfig, write_default_config};
