//! Delivery controller: build, rate-check, send, classify.

use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};

use crate::payload::PayloadBuilder;
use crate::record::{EventTime, Record};
use crate::time::{Clock, SystemClock};
use crate::transport::{HttpClient, HttpRequest};

use super::{DeliveryOutcome, RateLimiter};

/// Header carrying the gateway API key.
pub const API_KEY_HEADER: &str = "x-stackdriver-apikey";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("stackdriver-forwarder/", env!("CARGO_PKG_VERSION"));

const APPLICATION_JSON: &str = "application/json";

/// Sends one HTTP request per record, subject to a minimum interval.
///
/// The controller owns the rate limiter state. Sharing one controller
/// (for example behind an `Arc`) shares that state, so the interval holds
/// across every caller.
///
/// Each attempt is single and best-effort: there is no retry and no queue.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `C`: The clock used by the rate limiter (defaults to [`SystemClock`])
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stackdriver_forwarder::delivery::DeliveryController;
/// use stackdriver_forwarder::transport::ReqwestClient;
/// use url::Url;
///
/// let controller = DeliveryController::new(
///     ReqwestClient::with_timeout(None).unwrap(),
///     Url::parse("https://custom-gateway.stackdriver.com/v1/custom").unwrap(),
/// )
/// .with_rate_limit(Duration::from_millis(500));
/// ```
#[derive(Debug)]
pub struct DeliveryController<H, C = SystemClock> {
    client: H,
    url: url::Url,
    method: http::Method,
    api_key: HeaderValue,
    builder: PayloadBuilder,
    limiter: RateLimiter<C>,
}

impl<H> DeliveryController<H, SystemClock> {
    /// Creates a controller with default settings.
    ///
    /// Uses POST, an empty API key, the GCE payload format and no rate limit.
    #[must_use]
    pub fn new(client: H, url: url::Url) -> Self {
        Self {
            client,
            url,
            method: http::Method::POST,
            api_key: HeaderValue::from_static(""),
            builder: PayloadBuilder::default(),
            limiter: RateLimiter::disabled(),
        }
    }

    /// Sets the minimum interval between attempts. Zero disables limiting.
    #[must_use]
    pub fn with_rate_limit(mut self, interval: Duration) -> Self {
        self.limiter = RateLimiter::new(interval);
        self
    }
}

impl<H, C> DeliveryController<H, C> {
    /// Replaces the rate limiter, typically to inject a clock.
    #[must_use]
    pub fn with_limiter<C2>(self, limiter: RateLimiter<C2>) -> DeliveryController<H, C2> {
        DeliveryController {
            client: self.client,
            url: self.url,
            method: self.method,
            api_key: self.api_key,
            builder: self.builder,
            limiter,
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: http::Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the API key header value. The value is marked sensitive.
    #[must_use]
    pub fn with_api_key(mut self, mut api_key: HeaderValue) -> Self {
        api_key.set_sensitive(true);
        self.api_key = api_key;
        self
    }

    /// Sets the payload builder.
    #[must_use]
    pub const fn with_payload_builder(mut self, builder: PayloadBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Returns the target URL.
    #[must_use]
    pub const fn url(&self) -> &url::Url {
        &self.url
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// Returns the rate limiter holding the last attempt time.
    #[must_use]
    pub const fn limiter(&self) -> &RateLimiter<C> {
        &self.limiter
    }

    /// Builds the request for one record without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn build_request(&self, record: &Record) -> Result<HttpRequest, serde_json::Error> {
        let body = self.builder.build(record).to_json()?;

        Ok(HttpRequest::new(self.method.clone(), self.url.clone())
            .with_header(
                HeaderName::from_static(API_KEY_HEADER),
                self.api_key.clone(),
            )
            .with_header(
                http::header::USER_AGENT,
                HeaderValue::from_static(USER_AGENT),
            )
            .with_header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))
            .with_body(body))
    }
}

impl<H: HttpClient, C: Clock> DeliveryController<H, C> {
    /// Runs one delivery attempt and reports what happened.
    ///
    /// Nothing is logged here; see [`deliver`](Self::deliver).
    pub async fn attempt(&self, record: &Record) -> DeliveryOutcome {
        let request = match self.build_request(record) {
            Ok(request) => request,
            Err(e) => return DeliveryOutcome::Encode(e.to_string()),
        };

        // Recorded before sending so a slow request still counts.
        if let Err(limited) = self.limiter.try_acquire() {
            return DeliveryOutcome::RateLimited(limited);
        }

        match self.client.request(request).await {
            Ok(response) if response.is_success() => DeliveryOutcome::Delivered {
                status: response.status,
            },
            Ok(response) => DeliveryOutcome::Rejected {
                status: response.status,
                body: response.body_text(),
            },
            Err(e) => DeliveryOutcome::Transport(e),
        }
    }

    /// Delivers one record, logging the outcome. Never fails.
    ///
    /// Returns the outcome for callers that want it; the record pipeline
    /// ignores it.
    pub async fn deliver(&self, tag: &str, time: EventTime, record: &Record) -> DeliveryOutcome {
        let outcome = self.attempt(record).await;
        self.log_outcome(tag, time, &outcome);
        outcome
    }

    fn log_outcome(&self, tag: &str, time: EventTime, outcome: &DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Delivered { status } => {
                tracing::debug!(tag, %time, %status, "Delivered record to {}", self.url);
            }
            DeliveryOutcome::RateLimited(limited) => {
                tracing::info!(
                    tag,
                    elapsed_ms = %limited.elapsed.as_millis(),
                    interval_ms = %limited.interval.as_millis(),
                    "Dropped request due to rate limiting"
                );
            }
            DeliveryOutcome::Transport(e) => {
                tracing::warn!(
                    tag,
                    "{} request raised {} error: {e}",
                    self.method,
                    e.kind()
                );
                self.warn_failed(tag, outcome);
            }
            DeliveryOutcome::Rejected { .. } => self.warn_failed(tag, outcome),
            DeliveryOutcome::Encode(reason) => {
                tracing::warn!(tag, "Failed to encode payload: {reason}");
            }
        }
    }

    fn warn_failed(&self, tag: &str, outcome: &DeliveryOutcome) {
        tracing::warn!(
            tag,
            "failed to {} {} ({})",
            self.method,
            self.url,
            outcome.response_summary()
        );
    }
}
