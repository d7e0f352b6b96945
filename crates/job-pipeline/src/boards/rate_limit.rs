use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Minimum-interval limiter owned by one adapter instance.
///
/// `acquire` holds the lock across read, sleep and write of the last request
/// time. Two callers can therefore never both observe the same stale
/// timestamp and both skip the wait.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Option<Duration>,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// `requests_per_second <= 0` (or non-finite) disables limiting.
    pub fn per_second(requests_per_second: f64) -> Self {
        let min_interval = (requests_per_second.is_finite() && requests_per_second > 0.0)
            .then(|| Duration::from_secs_f64(1.0 / requests_per_second));

        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Option<Duration> {
        self.min_interval
    }

    /// Blocks until the next request may be sent and returns how long it slept.
    pub fn acquire(&self) -> Duration {
        let Some(min_interval) = self.min_interval else {
            return Duration::ZERO;
        };

        let mut last_request = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut slept = Duration::ZERO;
        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                slept = min_interval - elapsed;
                debug!(sleep_ms = slept.as_millis() as u64, "rate limiting");
                std::thread::sleep(slept);
            }
        }

        *last_request = Some(Instant::now());
        slept
    }
}
