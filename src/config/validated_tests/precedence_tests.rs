//! Tests for CLI > TOML > default precedence.

use std::time::Duration;

use super::*;

fn full_toml() -> TomlConfig {
    toml(
        r#"
        [output]
        url = "https://toml.example.com/v1/custom"
        http_method = "PUT"
        rate_limit_msec = 2000
        api_key = "toml-key"
        timeout = 20

        [input]
        tag = "toml.tag"
    "#,
    )
}

#[test]
fn toml_overrides_defaults() {
    let toml = full_toml();
    let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

    assert_eq!(config.url.as_str(), "https://toml.example.com/v1/custom");
    assert_eq!(config.method, http::Method::PUT);
    assert_eq!(config.rate_limit, Duration::from_secs(2));
    assert_eq!(config.api_key, "toml-key");
    assert_eq!(config.timeout, Some(Duration::from_secs(20)));
    assert_eq!(config.tag, "toml.tag");
}

#[test]
fn cli_overrides_toml() {
    let toml = full_toml();
    let cli = cli(&[
        "--url",
        "https://cli.example.com/v1/custom",
        "--http-method",
        "PATCH",
        "--rate-limit-msec",
        "0",
        "--api-key",
        "cli-key",
        "--timeout",
        "0",
        "--tag",
        "cli.tag",
    ]);
    let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

    assert_eq!(config.url.as_str(), "https://cli.example.com/v1/custom");
    assert_eq!(config.method, http::Method::PATCH);
    assert_eq!(config.rate_limit, Duration::ZERO);
    assert_eq!(config.api_key, "cli-key");
    assert!(config.timeout.is_none());
    assert_eq!(config.tag, "cli.tag");
}

#[test]
fn partial_cli_keeps_remaining_toml_values() {
    let toml = full_toml();
    let config =
        ValidatedConfig::from_raw(&cli(&["--api-key", "cli-key"]), Some(&toml)).unwrap();

    assert_eq!(config.api_key, "cli-key");
    assert_eq!(config.method, http::Method::PUT);
    assert_eq!(config.rate_limit, Duration::from_secs(2));
}

#[test]
fn invalid_toml_method_is_reported_even_with_valid_cli_url() {
    let toml = toml("[output]\nhttp_method = \"CONNECT\"");
    let result = ValidatedConfig::from_raw(&cli(&["--url", "https://ok.example.com"]), Some(&toml));

    assert!(matches!(result, Err(ConfigError::InvalidMethod(_))));
}
