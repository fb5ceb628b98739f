//! Default values for configuration options.

use std::time::Duration;

/// Default ingestion endpoint.
pub const URL: &str = "https://custom-gateway.stackdriver.com/v1/custom";

/// Default cloud type.
pub const CLOUD_TYPE: &str = "gce";

/// Default HTTP method.
pub const METHOD: &str = "POST";

/// Default minimum interval between requests in milliseconds (0 = disabled).
pub const RATE_LIMIT_MSEC: u64 = 0;

/// Default API key (empty).
pub const API_KEY: &str = "";

/// Default request timeout in seconds (0 = no timeout).
pub const TIMEOUT_SECS: u64 = 0;

/// Tag given to bare records that arrive without one.
pub const TAG: &str = "stackdriver";

/// Default rate-limit interval as Duration.
#[must_use]
pub const fn rate_limit() -> Duration {
    Duration::from_millis(RATE_LIMIT_MSEC)
}
