//! Wall clock abstraction.
//!
//! The rate limiter reads the current time through [`Clock`] so tests can
//! drive it with a manually advanced clock instead of sleeping.

use std::time::SystemTime;

/// Source of the current time.
///
/// # Example
///
/// ```
/// use stackdriver_forwarder::time::{Clock, SystemClock};
///
/// let now = SystemClock.now();
/// assert!(now >= std::time::SystemTime::UNIX_EPOCH);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Clock backed by [`SystemTime::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

/// Seconds since the Unix epoch as a float, the unit used for event times.
///
/// Times before the epoch map to `0.0`.
#[must_use]
pub fn epoch_secs(time: SystemTime) -> f64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0.0, |d| d.as_secs_f64())
}

#[cfg(test)]
pub(crate) use manual::ManualClock;
