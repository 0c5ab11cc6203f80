//! Retry Logic
//!
//! Bounded retry with capped exponential backoff for token requests,
//! expressed as a pure combinator over an idempotent operation.

use std::future::Future;
use std::time::Duration;

/// Backoff schedule for token requests: 3 retries (4 attempts total) with
/// exponential delays capped at 5 seconds.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Jitter factor (0.0-1.0).
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(5),
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let jitter_range = capped * self.jitter;
        let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;

        Duration::from_millis((capped + jitter).max(0.0) as u64)
    }
}

/// Run `operation` until it succeeds, the failure is not retryable, or the
/// retry budget is exhausted. Attempts are strictly sequential and bounded;
/// the last failure is returned unchanged.
pub(crate) async fn retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    is_retryable: P,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if attempt >= policy.max_retries || !is_retryable(&error) {
                    return Err(error);
                }

                let delay = policy.delay_for_attempt(attempt);
                tracing::debug!(attempt, ?delay, "retrying token request");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
