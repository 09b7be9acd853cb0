//! Fixed-interval request pacing.
//!
//! [`RateLimiter`] enforces a minimum spacing between admissions instead of a
//! bursty token bucket. The lock is held across the wait and the next slot is
//! measured from the moment a caller is actually admitted, so a stalled
//! executor delays later callers instead of releasing them together. Tokio's
//! mutex is fair, so callers are admitted in the order they asked.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

/// Slowest supported pacing: one request per day.
pub const MIN_RATE: f64 = 1.0 / 86_400.0;

/// Minimum-interval gate shared by all requests to one provider.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting one request every `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::const_new(None),
        }
    }

    /// Creates a limiter admitting `rate` requests per second.
    ///
    /// Rates below [`MIN_RATE`] are clamped to it. Non-positive or non-finite
    /// rates yield an unthrottled limiter.
    #[must_use]
    pub fn per_second(rate: f64) -> Self {
        let interval = if rate.is_finite() && rate > 0.0 {
            Duration::from_secs_f64(1.0 / rate.max(MIN_RATE))
        } else {
            Duration::ZERO
        };
        Self::new(interval)
    }

    /// The minimum spacing between admissions.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until one more request may be issued and returns the admission
    /// time.
    pub async fn acquire(&self) -> Instant {
        let mut next = self.next_slot.lock().await;
        if let Some(slot) = *next {
            let now = Instant::now();
            if slot > now {
                trace!(wait_ms = (slot - now).as_millis() as u64, "Rate limiting");
                sleep_until(slot).await;
            }
        }
        let admitted = Instant::now();
        *next = Some(admitted + self.interval);
        admitted
    }
}
