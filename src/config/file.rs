//! TOML configuration file parsing.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional so the file can be partial and merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Outbound request settings
    #[serde(default)]
    pub output: OutputSection,

    /// Input handling settings
    #[serde(default)]
    pub input: InputSection,
}

/// Outbound request section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Gateway URL
    pub url: Option<String>,

    /// Cloud type ("gce")
    pub cloud_type: Option<String>,

    /// HTTP method (default: POST)
    pub http_method: Option<String>,

    /// Minimum milliseconds between requests
    pub rate_limit_msec: Option<u64>,

    /// Gateway API key
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,
}

/// Input section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    /// Tag for records without one
    pub tag: Option<String>,
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
    r#"# stackdriver-forwarder configuration file

[output]
# Gateway URL (default: https://custom-gateway.stackdriver.com/v1/custom)
# url = "https://custom-gateway.stackdriver.com/v1/custom"

# Payload format. Only "gce" is implemented; other values fall back to it.
# cloud_type = "gce"

# HTTP method: POST, PUT, PATCH, GET or DELETE (default: POST)
# http_method = "POST"

# Minimum milliseconds between requests. Records arriving sooner are
# dropped, not queued. 0 disables rate limiting (default: 0)
# rate_limit_msec = 0

# Sent as the X-Stackdriver-ApiKey header (default: empty)
# api_key = ""

# Per-request timeout in seconds, 0 for none (default: 0)
# timeout = 10

[input]
# Tag for input lines that are bare records (default: "stackdriver")
# tag = "stackdriver"
"#
    .to_string()
}
