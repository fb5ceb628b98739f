//! Minimum-interval rate limiting against the most recent attempt.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use crate::time::{Clock, SystemClock};

/// Rejection returned when an attempt comes too soon after the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimited {
    /// Time since the previous recorded attempt
    pub elapsed: Duration,
    /// Configured minimum interval
    pub interval: Duration,
}

/// Tracks the time of the last attempted send.
///
/// This is not a window or a bucket: each check compares "now" against the
/// single most recent attempt. A rejected check leaves that time unchanged.
///
/// The check and the update happen under one lock, so concurrent callers
/// sharing a limiter observe one global order of attempts.
///
/// An interval of zero disables limiting; attempts are still recorded.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stackdriver_forwarder::delivery::RateLimiter;
///
/// let limiter = RateLimiter::new(Duration::from_secs(60));
/// assert!(limiter.try_acquire().is_ok());
/// assert!(limiter.try_acquire().is_err());
/// ```
#[derive(Debug)]
pub struct RateLimiter<C = SystemClock> {
    clock: C,
    interval: Duration,
    last_request_time: Mutex<Option<SystemTime>>,
}

impl RateLimiter<SystemClock> {
    /// Creates a limiter using the system clock.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self::with_clock(interval, SystemClock)
    }

    /// Creates a limiter that never rejects.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl<C> RateLimiter<C> {
    /// Creates a limiter reading time from `clock`.
    #[must_use]
    pub const fn with_clock(interval: Duration, clock: C) -> Self {
        Self {
            clock,
            interval,
            last_request_time: Mutex::new(None),
        }
    }

    /// The configured minimum interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true if an interval is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    /// Time of the most recent recorded attempt, if any.
    #[must_use]
    pub fn last_request_time(&self) -> Option<SystemTime> {
        *self
            .last_request_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Checks the interval and, if allowed, records now as the last attempt.
    ///
    /// A clock that moved backwards counts as zero elapsed time.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimited`] if less than the interval has passed since the
    /// previous recorded attempt. Nothing is recorded in that case.
    pub fn try_acquire(&self) -> Result<(), RateLimited> {
        let mut last = self
            .last_request_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();

        if self.is_enabled() {
            if let Some(previous) = *last {
                let elapsed = now.duration_since(previous).unwrap_or(Duration::ZERO);
                if elapsed < self.interval {
                    return Err(RateLimited {
                        elapsed,
                        interval: self.interval,
                    });
                }
            }
        }

        *last = Some(now);
        Ok(())
    }
}
