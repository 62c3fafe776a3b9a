//! Bounded retry for remote pool requests
//!
//! `RetryExecutor` drives a fallible async operation under a `RetryPolicy`:
//! transport failures and 5xx responses are retried after a delay, anything
//! else aborts at once, and the last error is surfaced when attempts run out.

use crate::error::{PoolError, Result};
use quokka_constants::retry::{DYNAMIC_INFO_DELAY_MS, MAX_ATTEMPTS, POOL_INFO_DELAY_MS};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Retry configuration for one kind of request
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub delay: Duration,
    /// Growth factor applied to the delay per attempt, 1.0 keeps it fixed
    pub backoff_multiplier: f64,
    /// Upper bound for the grown delay
    pub max_delay: Duration,
    /// Whether an undecodable body is retried like a transport failure
    pub retry_malformed: bool,
}

impl RetryPolicy {
    /// Create a policy with a fixed delay between attempts
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            backoff_multiplier: 1.0,
            max_delay: delay,
            retry_malformed: false,
        }
    }

    /// Single attempt, never retried
    pub fn no_retry() -> Self {
        Self::fixed(1, Duration::ZERO)
    }

    /// Policy of the pool-info endpoint
    pub fn pool_info() -> Self {
        Self::fixed(MAX_ATTEMPTS, Duration::from_millis(POOL_INFO_DELAY_MS))
    }

    /// Policy of the dynamic-info endpoint
    pub fn dynamic_info() -> Self {
        Self::fixed(MAX_ATTEMPTS, Duration::from_millis(DYNAMIC_INFO_DELAY_MS))
    }

    /// Grow the delay by `multiplier` per attempt, capped at `max_delay`
    pub fn with_backoff(mut self, multiplier: f64, max_delay: Duration) -> Self {
        self.backoff_multiplier = multiplier.max(1.0);
        self.max_delay = max_delay.max(self.delay);
        self
    }

    /// Choose whether malformed responses are retried
    pub fn with_retry_malformed(mut self, retry: bool) -> Self {
        self.retry_malformed = retry;
        self
    }

    /// Attempts the executor will make, never below one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Check if `err` should be retried under this policy
    pub fn is_retryable(&self, err: &PoolError) -> bool {
        match err {
            PoolError::Malformed { .. } => self.retry_malformed,
            _ => err.is_retryable(),
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if self.backoff_multiplier <= 1.0 {
            return self.delay;
        }
        let exponent = attempt.saturating_sub(1) as i32;
        let grown = self.delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(grown.min(self.max_delay.as_secs_f64()))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::pool_info()
    }
}

/// Runs operations under a retry policy
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Execute `operation` until it succeeds, fails fatally, or runs out of attempts
    ///
    /// The operation is invoked afresh for every attempt; nothing is carried
    /// over between attempts. On exhaustion the error of the last attempt is
    /// returned unchanged.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!(attempt, max_attempts, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    if !self.policy.is_retryable(&err) {
                        warn!(
                            attempt,
                            max_attempts,
                            error = %err,
                            "Request failed with non-retryable error"
                        );
                        return Err(err);
                    }

                    if attempt >= max_attempts {
                        warn!(
                            attempts = attempt,
                            error = %err,
                            "Request failed, retry attempts exhausted"
                        );
                        return Err(err);
                    }

                    let delay = self.policy.delay_for(attempt);
                    debug!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
