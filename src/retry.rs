//! Backoff for rate-limited API calls.
//!
//! A 429 from the API is retried after `base_delay * 2^(k-1)` for the k-th
//! retry, at most `max_retries` times. Every other error is returned at once.

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::api::ApiError;

/// Retry and pacing policy shared by the lister and the deleter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,
    /// Pause after every successful call.
    pub call_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(2),
            max_retries: 3,
            call_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_retries: u32, call_delay: Duration) -> Self {
        Self {
            base_delay,
            max_retries,
            call_delay,
        }
    }

    /// No waiting at all; retries still happen.
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(Duration::ZERO, max_retries, Duration::ZERO)
    }

    /// Delay before retry number `retry` (1-indexed).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exp = retry.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exp)
    }

    /// Sleep for the pacing delay, if any.
    pub async fn pace(&self) {
        if !self.call_delay.is_zero() {
            tokio::time::sleep(self.call_delay).await;
        }
    }

    /// Run `op` until it succeeds, fails with a non-rate-limit error, or the
    /// retry budget is spent.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut retries = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_rate_limit() && retries < self.max_retries => {
                    retries += 1;
                    let delay = self.delay_for(retries);
                    debug!(
                        "Rate limit hit in {}, waiting {}ms before retry {}...",
                        operation,
                        delay.as_millis(),
                        retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
