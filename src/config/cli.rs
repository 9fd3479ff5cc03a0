//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// reactive-http: observable HTTP requests from the command line
///
/// Issues one request through a request controller and logs every
/// state change (loading, status, data, failure, abort) as it happens.
#[derive(Debug, Parser)]
#[command(name = "reactive-http")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Request URL, absolute or relative to the base URL (required for run mode)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// HTTP method (default: GET)
    #[arg(long, short = 'X')]
    pub method: Option<String>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", short = 'H', value_name = "K=V")]
    pub headers: Vec<String>,

    /// Bearer token for Authorization header
    #[arg(long)]
    pub bearer: Option<String>,

    /// Request body
    #[arg(long, short)]
    pub data: Option<String>,

    /// Base URL that relative request URLs are joined onto
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Transport timeout in milliseconds
    #[arg(long = "timeout")]
    pub timeout_ms: Option<u64>,

    /// Abort the request after this many milliseconds
    #[arg(long = "abort-after", value_name = "MS")]
    pub abort_after_ms: Option<u64>,

    /// Serve a canned response instead of calling the server
    #[arg(long)]
    pub mock: bool,

    /// Status code of the canned response (default: 200)
    #[arg(long = "mock-status")]
    pub mock_status: Option<u16>,

    /// Body of the canned response
    #[arg(long = "mock-body")]
    pub mock_body: Option<String>,

    /// Delay before the canned response is served, in milliseconds (default: 2000)
    #[arg(long = "mock-delay", value_name = "MS")]
    pub mock_delay_ms: Option<u64>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for reactive-http
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "reactive-http.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
