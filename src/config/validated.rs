//! Validated configuration after merging CLI and TOML sources.
//!
//! All validation happens during construction, before any record is read.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use http::{HeaderValue, Method};
use url::Url;

use crate::payload::CloudType;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::file::TomlConfig;

/// HTTP methods accepted for `http_method`.
pub const SUPPORTED_METHODS: [Method; 5] = [
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::GET,
    Method::DELETE,
];

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Gateway URL
    pub url: Url,

    /// Normalized cloud type
    pub cloud_type: CloudType,

    /// HTTP method, one of [`SUPPORTED_METHODS`]
    pub method: Method,

    /// Minimum interval between requests (zero = disabled)
    pub rate_limit: Duration,

    /// API key header value
    pub api_key: HeaderValue,

    /// Per-request timeout (`None` = transport default)
    pub timeout: Option<Duration>,

    /// Tag for bare input records
    pub tag: String,

    /// Dry-run mode (log payloads without sending)
    pub dry_run: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "empty"
        } else {
            "set"
        };
        let timeout = self
            .timeout
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));

        write!(
            f,
            "Config {{ url: {}, cloud_type: {}, method: {}, rate_limit: {}ms, api_key: {}, \
             timeout: {}, tag: {}, dry_run: {} }}",
            self.url,
            self.cloud_type,
            self.method,
            self.rate_limit.as_millis(),
            api_key,
            timeout,
            self.tag,
            self.dry_run,
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
    /// - URL is invalid or not http(s)
    /// - HTTP method is not supported
    /// - API key contains characters not allowed in a header
    /// - Tag is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let output = toml.map(|t| &t.output);

        let url = Self::resolve_url(cli, toml)?;
        let cloud_type = Self::resolve_cloud_type(cli, toml);
        let method = Self::resolve_method(cli, toml)?;
        let api_key = Self::resolve_api_key(cli, toml)?;
        let tag = Self::resolve_tag(cli, toml)?;

        let rate_limit = cli
            .rate_limit_msec
            .or_else(|| output.and_then(|o| o.rate_limit_msec))
            .map_or_else(defaults::rate_limit, Duration::from_millis);

        let timeout_secs = cli
            .timeout
            .or_else(|| output.and_then(|o| o.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Self {
            url,
            cloud_type,
            method,
            rate_limit,
            api_key,
            timeout,
            tag,
            dry_run: cli.dry_run,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or the
    /// merged configuration is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.output.url.as_deref()))
            .unwrap_or(defaults::URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{other}', expected http or https"),
            }),
        }
    }

    fn resolve_cloud_type(cli: &Cli, toml: Option<&TomlConfig>) -> CloudType {
        let name = cli
            .cloud_type
            .as_deref()
            .or_else(|| toml.and_then(|t| t.output.cloud_type.as_deref()))
            .unwrap_or(defaults::CLOUD_TYPE);

        let (cloud_type, fell_back) = CloudType::normalize(name);
        if fell_back {
            tracing::info!("Unsupported cloud_type '{name}', using '{cloud_type}'");
        }
        cloud_type
    }

    fn resolve_method(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Method, ConfigError> {
        let method_str = cli
            .http_method
            .as_deref()
            .or_else(|| toml.and_then(|t| t.output.http_method.as_deref()))
            .unwrap_or(defaults::METHOD);

        parse_method(method_str)
    }

    fn resolve_api_key(cli: &Cli, toml: Option<&TomlConfig>) -> Result<HeaderValue, ConfigError> {
        let key = cli
            .api_key
            .as_deref()
            .or_else(|| toml.and_then(|t| t.output.api_key.as_deref()))
            .unwrap_or(defaults::API_KEY);

        let mut value = HeaderValue::from_str(key).map_err(|e| ConfigError::InvalidApiKey {
            reason: e.to_string(),
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    fn resolve_tag(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let tag = cli
            .tag
            .as_deref()
            .or_else(|| toml.and_then(|t| t.input.tag.as_deref()))
            .unwrap_or(defaults::TAG)
            .trim();

        if tag.is_empty() {
            return Err(ConfigError::EmptyTag);
        }
        Ok(tag.to_string())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::file::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_method(s: &str) -> Result<Method, ConfigError> {
    let upper = s.trim().to_ascii_uppercase();
    SUPPORTED_METHODS
        .iter()
        .find(|m| m.as_str() == upper)
        .cloned()
        .ok_or_else(|| ConfigError::InvalidMethod(s.to_string()))
}
