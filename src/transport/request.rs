//! HTTP request/response types and client trait.

use super::HttpError;

/// An outbound HTTP request.
///
/// Built once per delivery attempt by the delivery controller and handed
/// to an [`HttpClient`]. Uses the `http` crate's method and header types.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Target URL
    pub url: url::Url,
    /// Request headers
    pub headers: http::HeaderMap,
    /// Optional request body
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a header, replacing any existing value for the same name.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A response received from the server. The body is fully buffered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: http::StatusCode,
    /// Response headers
    pub headers: http::HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Trait for sending HTTP requests.
///
/// The delivery controller is generic over this trait so tests can
/// substitute a recording mock for the real network.
///
/// # Example
///
/// ```ignore
/// use stackdriver_forwarder::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};
///
/// struct AlwaysOk;
///
/// impl HttpClient for AlwaysOk {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(http::StatusCode::OK, http::HeaderMap::new(), vec![]))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns whatever response the server produced.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when no response could be obtained:
    /// - Connection failure ([`HttpError::Connection`])
    /// - Timeout ([`HttpError::Timeout`])
    /// - Unusable URL ([`HttpError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
