//! Exponential-backoff retry wrapper for outbound E-utilities requests.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::Result;

/// Retry policy applied to every outbound request.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first. Must be at least 1.
    pub max_attempts: u32,
    /// Wait before the second attempt; doubled after every failed attempt.
    /// Must be greater than zero.
    pub initial_wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_wait: Duration::from_secs(1),
        }
    }
}

/// Run `operation`, retrying failures with pure exponential backoff.
///
/// Any transport-level or non-2xx failure surfaced by `operation` is logged
/// and retried until the attempt budget is spent; the final error is then
/// returned to the caller unchanged. No jitter, no wait cap. A successful
/// response returns immediately and is never retried.
pub(crate) async fn with_retry<T, F, Fut>(
    mut operation: F,
    config: &RetryConfig,
    context: &str,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    debug_assert!(config.max_attempts >= 1);
    debug_assert!(config.initial_wait > Duration::ZERO);

    let mut wait = config.initial_wait;
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < config.max_attempts => {
                warn!(
                    context,
                    attempt,
                    wait_secs = wait.as_secs_f64(),
                    error = %err,
                    "Request failed, retrying"
                );
                tokio::time::sleep(wait).await;
                wait *= 2;
                attempt += 1;
            }
            Err(err) => {
                warn!(context, attempt, error = %err, "Request failed, attempts exhausted");
                return Err(err);
            }
        }
    }
}
