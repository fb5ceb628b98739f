//! Configuration layer.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Every option resolves with the same priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments**
//! 2. **TOML config file**
//! 3. **Built-in defaults**
//!
//! Every option has a default, so an empty command line is a valid
//! configuration that posts to the public gateway without an API key.
//!
//! # Normalization
//!
//! - `cloud_type` values other than `gce` fall back to `gce`. This is logged
//!   at info level and is never an error.
//! - `http_method` is case-insensitive but must be one of the supported
//!   methods; anything else is rejected before any record is read.
//! - `rate_limit_msec = 0` and `timeout = 0` both mean "disabled".

mod cli;
pub mod defaults;
mod error;
mod file;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use file::{InputSection, OutputSection, TomlConfig, default_config_template};
pub use validated::{SUPPORTED_METHODS, ValidatedConfig, write_default_config};
