//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Forwards metric records read from stdin to a StackDriver custom metrics gateway.
///
/// Each input line is a JSON record, a `[tag, time, record]` message or a
/// `[tag, [[time, record], ...]]` forward batch.
#[derive(Debug, Parser)]
#[command(name = "stackdriver-forwarder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Gateway URL
    #[arg(long)]
    pub url: Option<String>,

    /// Cloud type selecting the payload format (only "gce" is implemented)
    #[arg(long = "cloud-type")]
    pub cloud_type: Option<String>,

    /// HTTP method (POST, PUT, PATCH, GET or DELETE)
    #[arg(long = "http-method")]
    pub http_method: Option<String>,

    /// Minimum milliseconds between requests (0 disables rate limiting)
    #[arg(long = "rate-limit-msec", value_name = "MSEC")]
    pub rate_limit_msec: Option<u64>,

    /// Gateway API key
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Tag for input records that do not carry one
    #[arg(long)]
    pub tag: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log payloads instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "stackdriver-forwarder.toml")]
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
