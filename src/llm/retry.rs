//! Retry with exponential backoff for language-model calls

use std::future::Future;
use std::time::Duration;

use log::{info, warn};

use crate::clock::Clock;
use crate::error::LlmError;

/// How many times to try a call and how long to back off in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Upper bound for a single backoff sleep
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Sleep before retrying after the given zero-based attempt failed.
    ///
    /// A provider-supplied `Retry-After` replaces the computed backoff.
    pub fn backoff(&self, attempt: u32, error: &LlmError) -> Duration {
        if let LlmError::RateLimited {
            retry_after: Some(retry_after),
        } = error
        {
            return *retry_after;
        }
        let secs = 2u64.saturating_pow(attempt);
        Duration::from_secs(secs).min(self.max_backoff)
    }
}

/// Run `operation` until it succeeds, fails permanently or runs out of attempts.
///
/// Only transient errors (network, 429, 5xx) are retried. The last error is
/// returned when every attempt fails.
pub async fn with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    clock: &dyn Clock,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    info!("LLM request succeeded after {} retries", attempt);
                }
                return Ok(value);
            }
            Err(error) if !error.is_transient() => {
                warn!("Non-retryable LLM error: {}", error);
                return Err(error);
            }
            Err(error) if attempt + 1 >= attempts => {
                warn!("LLM request failed after {} attempts: {}", attempts, error);
                return Err(error);
            }
            Err(error) => {
                let delay = policy.backoff(attempt, &error);
                warn!(
                    "LLM request failed (attempt {}/{}): {}. Retrying in {}s",
                    attempt + 1,
                    attempts,
                    error,
                    delay.as_secs()
                );
                clock.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
