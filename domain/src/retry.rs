//! Bounded exponential backoff policy.

use std::time::Duration;

/// How often, and how patiently, a failing stage call is re-attempted.
///
/// Delays grow geometrically with no jitter: `initial_delay`,
/// `initial_delay * factor`, `initial_delay * factor^2`, ...
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Zero is treated as one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub backoff_factor: f64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_factor,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay before the retry that follows failed attempt `attempt` (0-indexed).
    ///
    /// Saturates at [`Duration::MAX`] when the product does not fit.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let factor = self.backoff_factor.max(0.0).powi(exponent);
        Duration::try_from_secs_f64(self.initial_delay.as_secs_f64() * factor)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    /// 3 attempts, 1s initial delay, doubling.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), 2.0)
    }
}
