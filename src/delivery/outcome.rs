//! Result of a single delivery attempt.

use std::fmt;

use crate::transport::HttpError;

use super::RateLimited;

/// What happened to one record.
///
/// Returned by [`DeliveryController::attempt`](super::DeliveryController::attempt).
/// The never-failing entry point logs this and discards it.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The endpoint answered with a 2xx status.
    Delivered {
        /// Response status
        status: http::StatusCode,
    },

    /// Skipped because the previous attempt was too recent. No request was sent.
    RateLimited(RateLimited),

    /// No response was received.
    Transport(HttpError),

    /// The endpoint answered with a non-2xx status.
    Rejected {
        /// Response status
        status: http::StatusCode,
        /// Response body as text
        body: String,
    },

    /// The payload could not be serialized. No request was sent.
    Encode(String),
}

impl DeliveryOutcome {
    /// Returns true if the record reached the endpoint successfully.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Returns true for outcomes that are logged as warnings.
    ///
    /// Rate limiting is a deliberate skip, not a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Rejected { .. } | Self::Encode(_)
        )
    }

    /// Returns true if the attempt was dropped by the rate limiter.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }

    /// Response detail used in failure log lines.
    ///
    /// `"<code> <reason> <body>"` when a response exists, `"no response"` otherwise.
    #[must_use]
    pub fn response_summary(&self) -> String {
        match self {
            Self::Delivered { status } => status_line(*status),
            Self::Rejected { status, body } => format!("{} {body}", status_line(*status)),
            Self::RateLimited(_) | Self::Transport(_) | Self::Encode(_) => {
                "no response".to_string()
            }
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered { status } => write!(f, "delivered ({})", status_line(*status)),
            Self::RateLimited(limited) => write!(
                f,
                "rate limited ({}ms since last request, interval {}ms)",
                limited.elapsed.as_millis(),
                limited.interval.as_millis()
            ),
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Rejected { .. } => write!(f, "rejected ({})", self.response_summary()),
            Self::Encode(reason) => write!(f, "payload encoding failed: {reason}"),
        }
    }
}

fn status_line(status: http::StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || status.as_str().to_string(),
        |reason| format!("{} {reason}", status.as_str()),
    )
}
