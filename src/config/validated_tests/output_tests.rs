//! Tests for output options: URL, cloud type, method, API key, timeout, tag.

use std::time::Duration;

use crate::payload::CloudType;

use super::*;

mod endpoint_url {
    use super::*;

    #[test]
    fn invalid_url_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--url", "not a url"]), None);

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--url", "ftp://gw.example.com/"]), None);

        match result {
            Err(ConfigError::InvalidUrl { reason, .. }) => assert!(reason.contains("ftp")),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn plain_http_is_accepted() {
        let config =
            ValidatedConfig::from_raw(&cli(&["--url", "http://127.0.0.1:8080/v1/custom"]), None)
                .unwrap();

        assert_eq!(config.url.port(), Some(8080));
    }
}

mod cloud_type {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn gce_is_accepted_case_insensitively() {
        let config = ValidatedConfig::from_raw(&cli(&["--cloud-type", "GCE"]), None).unwrap();
        assert_eq!(config.cloud_type, CloudType::Gce);
        assert!(!logs_contain("Unsupported cloud_type"));
    }

    #[test]
    #[traced_test]
    fn unknown_cloud_type_falls_back_without_error() {
        let config = ValidatedConfig::from_raw(&cli(&["--cloud-type", "aws"]), None).unwrap();
        assert_eq!(config.cloud_type, CloudType::Gce);
        assert!(logs_contain("Unsupported cloud_type 'aws', using 'gce'"));
    }

    #[test]
    fn unknown_cloud_type_from_toml_falls_back() {
        let toml = toml("[output]\ncloud_type = \"azure\"");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert_eq!(config.cloud_type, CloudType::Gce);
    }
}

mod method {
    use super::*;

    #[test]
    fn supported_methods_parse_case_insensitively() {
        for (input, expected) in [
            ("post", http::Method::POST),
            ("Put", http::Method::PUT),
            ("PATCH", http::Method::PATCH),
            ("get", http::Method::GET),
            ("delete", http::Method::DELETE),
        ] {
            let config = ValidatedConfig::from_raw(&cli(&["--http-method", input]), None).unwrap();
            assert_eq!(config.method, expected, "Failed for method: {input}");
        }
    }

    #[test]
    fn unsupported_method_fails_at_configuration() {
        for input in ["HEAD", "OPTIONS", "TRACE", "FETCH", ""] {
            let result = ValidatedConfig::from_raw(&cli(&["--http-method", input]), None);
            assert!(
                matches!(result, Err(ConfigError::InvalidMethod(_))),
                "Expected rejection for method: {input:?}"
            );
        }
    }

    #[test]
    fn error_names_the_method() {
        let err = ValidatedConfig::from_raw(&cli(&["--http-method", "TRACE"]), None).unwrap_err();
        assert!(err.to_string().contains("TRACE"));
    }
}

mod api_key {
    use super::*;

    #[test]
    fn api_key_is_sensitive() {
        let config = ValidatedConfig::from_raw(&cli(&["--api-key", "k-123"]), None).unwrap();

        assert_eq!(config.api_key, "k-123");
        assert!(config.api_key.is_sensitive());
    }

    #[test]
    fn api_key_with_newline_is_rejected() {
        let toml = toml("[output]\napi_key = \"bad\\nkey\"");
        let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

        assert!(matches!(result, Err(ConfigError::InvalidApiKey { .. })));
    }
}

mod timeout_and_rate_limit {
    use super::*;

    #[test]
    fn zero_timeout_means_none() {
        let config = ValidatedConfig::from_raw(&cli(&["--timeout", "0"]), None).unwrap();
        assert!(config.timeout.is_none());
    }

    #[test]
    fn positive_timeout_is_kept() {
        let config = ValidatedConfig::from_raw(&cli(&["--timeout", "30"]), None).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rate_limit_is_milliseconds() {
        let config = ValidatedConfig::from_raw(&cli(&["--rate-limit-msec", "1500"]), None).unwrap();
        assert_eq!(config.rate_limit, Duration::from_millis(1_500));
    }
}

mod tag {
    use super::*;

    #[test]
    fn blank_tag_is_rejected() {
        let result = ValidatedConfig::from_raw(&cli(&["--tag", "  "]), None);
        assert!(matches!(result, Err(ConfigError::EmptyTag)));
    }

    #[test]
    fn tag_is_trimmed() {
        let config = ValidatedConfig::from_raw(&cli(&["--tag", " app.cpu "]), None).unwrap();
        assert_eq!(config.tag, "app.cpu");
    }
}
