//! Retry with capped exponential backoff and jitter for remote calls

use std::time::Duration;

use crate::error::ApiError;

/// Backoff parameters for one call site.
///
/// Each [`execute_with_retry`] invocation starts its own attempt counter;
/// no state is shared across independent calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the initial attempt (total calls = `max_retries + 1`)
    pub max_retries: u32,
    /// Base of the exponential wait, in seconds
    pub base: f64,
    /// Upper bound on the un-jittered wait
    pub cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 8,
            base: 2.0,
            cap: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Capped exponential wait before retry `attempt` (1-based), no jitter.
    fn backoff_secs(&self, attempt: u32) -> f64 {
        self.base.powi(attempt as i32).min(self.cap.as_secs_f64())
    }

    /// Full wait: capped exponential scaled by a factor in [1.0, 1.2).
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let jitter = 1.0 + 0.2 * rand::random::<f64>();
        Duration::from_secs_f64(self.backoff_secs(attempt) * jitter)
    }
}

/// Run a remote call, retrying transient failures with backoff.
///
/// Retries only errors whose [`ApiError::is_retryable`] is true, up to
/// `policy.max_retries` times. Each failed attempt is logged with the
/// attempt count and underlying error before sleeping. The last error is
/// surfaced to the caller once the budget is exhausted or the error kind
/// is not transient.
pub fn execute_with_retry<T>(
    label: &str,
    policy: &RetryPolicy,
    mut call: impl FnMut() -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let mut attempt = 0u32;
    loop {
        match call() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < policy.max_retries && e.is_retryable() => {
                attempt += 1;
                let wait = policy.backoff_duration(attempt);
                log::warn!(
                    "{label}: attempt {attempt}/{} failed: {e}, retrying in {:.1}s",
                    policy.max_retries,
                    wait.as_secs_f64()
                );
                std::thread::sleep(wait);
            }
            Err(e) => {
                log::error!("{label}: failed permanently: {e}");
                return Err(e);
            }
        }
    }
}
