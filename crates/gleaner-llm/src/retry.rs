//! Retry with exponential backoff

use crate::LlmError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// How failed calls are retried
///
/// A call is attempted once plus up to `max_retries` more times. After the
/// failure of attempt `n` (zero-based) the policy waits `base_delay * 2^n`.
/// Non-retryable errors (see [`LlmError::is_retryable`]) are returned at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay after the failure of zero-based `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Sum of every backoff delay when all retries are used
    pub fn total_delay(&self) -> Duration {
        (0..self.max_retries).fold(Duration::ZERO, |total, attempt| {
            total.saturating_add(self.delay_for(attempt))
        })
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out
    ///
    /// `op` receives the zero-based attempt number. The last observed error
    /// is returned when every attempt fails.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, LlmError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 0;
        loop {
            let error = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !error.is_retryable() {
                warn!(error = %error, "Classifier call failed permanently, not retrying");
                return Err(error);
            }
            if attempt >= self.max_retries {
                warn!(
                    attempts = attempt + 1,
                    error = %error,
                    "Classifier call failed after all retries"
                );
                return Err(error);
            }

            let delay = self.delay_for(attempt);
            warn!(
                "Classifier call failed (attempt {}/{}), retrying in {}ms: {}",
                attempt + 1,
                self.max_retries + 1,
                delay.as_millis(),
                error
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
