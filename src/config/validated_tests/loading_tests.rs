//! Tests for configuration loading and defaults.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::{NamedTempFile, tempdir};

use crate::payload::CloudType;

use super::*;

mod defaults {
    use super::*;

    #[test]
    fn empty_cli_yields_defaults() {
        let config = ValidatedConfig::from_raw(&cli(&[]), None).unwrap();

        assert_eq!(
            config.url.as_str(),
            "https://custom-gateway.stackdriver.com/v1/custom"
        );
        assert_eq!(config.cloud_type, CloudType::Gce);
        assert_eq!(config.method, http::Method::POST);
        assert_eq!(config.rate_limit, Duration::ZERO);
        assert_eq!(config.api_key, "");
        assert!(config.timeout.is_none());
        assert_eq!(config.tag, "stackdriver");
        assert!(!config.dry_run);
    }

    #[test]
    fn display_hides_api_key() {
        let config = ValidatedConfig::from_raw(&cli(&["--api-key", "top-secret"]), None).unwrap();
        let shown = config.to_string();

        assert!(!shown.contains("top-secret"));
        assert!(shown.contains("api_key: set"));
    }

    #[test]
    fn display_summarizes_settings() {
        let config = ValidatedConfig::from_raw(
            &cli(&["--rate-limit-msec", "250", "--timeout", "5"]),
            None,
        )
        .unwrap();
        let shown = config.to_string();

        assert!(shown.contains("rate_limit: 250ms"));
        assert!(shown.contains("timeout: 5s"));
        assert!(shown.contains("api_key: empty"));
        assert!(shown.contains("cloud_type: gce"));
    }
}

mod config_load {
    use super::*;

    #[test]
    fn load_from_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [output]
            url = "https://gw.example.com/v1/custom"
            rate_limit_msec = 1000
        "#
        )
        .unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);
        let config = ValidatedConfig::load(&cli).unwrap();

        assert_eq!(config.url.as_str(), "https://gw.example.com/v1/custom");
        assert_eq!(config.rate_limit, Duration::from_secs(1));
    }

    #[test]
    fn load_without_config_file() {
        let config = ValidatedConfig::load(&cli(&["--http-method", "put"])).unwrap();
        assert_eq!(config.method, http::Method::PUT);
    }

    #[test]
    fn load_nonexistent_config_file_returns_error() {
        let cli = cli(&["--config", "nonexistent_file_12345.toml"]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_invalid_config_file_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nunknown = 1").unwrap();

        let cli = cli(&["--config", file.path().to_str().unwrap()]);
        let result = ValidatedConfig::load(&cli);

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}

mod write_config {
    use super::super::super::validated::write_default_config;
    use super::*;

    #[test]
    fn write_default_config_creates_loadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test-config.toml");

        write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[output]"));
        assert!(content.contains("[input]"));

        let cli = cli(&["--config", path.to_str().unwrap()]);
        assert!(ValidatedConfig::load(&cli).is_ok());
    }

    #[test]
    fn write_default_config_to_invalid_path_returns_error() {
        let path = Path::new("/nonexistent_dir_12345/config.toml");
        let result = write_default_config(path);

        assert!(matches!(result, Err(ConfigError::FileWrite { .. })));
    }
}
