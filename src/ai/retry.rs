//! Retry loop for rate-limited generation calls.
//!
//! Rate-limit-class errors (see [`crate::types::error::is_rate_limit_message`])
//! are retried up to `max_retries` times with base-2 exponential backoff
//! (1s, 2s, 4s, ...). Every other failure surfaces immediately with the
//! upstream message attached. Retries block the calling request for the full
//! backoff duration; there is no cancellation.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::constants::retry::BACKOFF_BASE_SECS;
use crate::types::{CompanionError, Result};

/// Delay before retrying after the `attempt`-th failure (0-based).
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(BACKOFF_BASE_SECS.saturating_pow(attempt))
}

/// Run `op` until it succeeds, fails non-retryably, or exhausts
/// `max_retries + 1` total attempts on rate-limit-class errors.
pub async fn retry_rate_limited<T, F, Fut>(provider: &str, max_retries: u32, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limited() && attempt < max_retries => {
                let wait = backoff_delay(attempt);
                warn!(
                    provider,
                    attempt = attempt + 1,
                    max_retries,
                    wait_secs = wait.as_secs(),
                    "Rate limited, retrying after backoff"
                );
                sleep(wait).await;
                attempt += 1;
            }
            Err(err) if err.is_rate_limited() => {
                return Err(CompanionError::Generation(format!(
                    "{provider}: exhausted retries after {} rate-limited attempts: {err}",
                    max_retries + 1
                )));
            }
            Err(err) => return Err(err),
        }
    }
}
