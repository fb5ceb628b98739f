//! Error types for HTTP transport.

use thiserror::Error;

/// A failure that prevented a response from being received at all.
///
/// Non-2xx responses are not errors at this layer; they come back as an
/// [`HttpResponse`](super::HttpResponse) and are classified by the caller.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection could not be established or was reset.
    ///
    /// Covers DNS failures, refused connections and I/O errors
    /// while reading the response.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configured request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built from the given URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl HttpError {
    /// Short name of the failure class, used in log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Timeout => "timeout",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }
}
