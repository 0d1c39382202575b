//! Bounded retry policy for provider requests.

use std::time::Duration;

use crate::config::DEFAULT_ATTEMPT_LIMIT;

/// How many times a failed provider call is repeated, and how long to wait
/// in between.
///
/// `attempt_limit` counts retries after the first attempt, so a call is made
/// at most `attempt_limit + 1` times. A limit of 3 allows four calls, one
/// fewer than a loop that retries while `attempts <= limit` after each
/// failure would make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempt_limit: u32,
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_limit: DEFAULT_ATTEMPT_LIMIT,
            base_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempt_limit: u32, base_backoff: Duration) -> Self {
        Self {
            attempt_limit,
            base_backoff,
        }
    }

    /// No waiting between attempts.
    pub fn immediate(attempt_limit: u32) -> Self {
        Self::new(attempt_limit, Duration::ZERO)
    }

    /// Total number of calls allowed.
    pub fn max_attempts(&self) -> u32 {
        self.attempt_limit.saturating_add(1)
    }

    /// Exponential delay before the given retry (1-based), capped at 2^8
    /// times the base.
    pub fn backoff_delay(&self, retry_number: u32) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8);
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    pub async fn wait(&self, retry_number: u32) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
