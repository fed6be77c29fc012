//! Retry configuration and the shared retry helper.
//!
//! Search and list calls go through [`with_retry()`], which re-issues a
//! request on transient errors (5xx, timeouts, connection failures).
//! Detail fetches are never retried: they rely on the stale-cache check
//! and static fallbacks instead.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::telemetry;
use crate::{Result, SaucierError};

/// Configuration for retry behaviour on transient errors.
///
/// The default allows one extra attempt after the first failure:
///
/// ```rust
/// # use saucier::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new().initial_delay(Duration::from_millis(100));
/// assert_eq!(config.max_attempts, 2);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 2.
    pub max_attempts: u32,
    /// Base delay before the first retry. Default: 250ms.
    pub initial_delay: Duration,
    /// Maximum delay between retries (caps exponential growth). Default: 5s.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Create a new config with defaults (one retry).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the base delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry number `attempt` (0-indexed).
    ///
    /// Exponential backoff: `initial_delay * 2^attempt`, capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_delay)
    }
}

/// Execute an async operation with retry logic.
///
/// Retries on transient errors (as classified by
/// [`SaucierError::is_transient()`]) up to `config.max_attempts`.
/// Permanent errors are returned immediately.
pub(crate) async fn with_retry<F, Fut, T>(config: &RetryConfig, operation: &str, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..config.max_attempts {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() => {
                if attempt + 1 < config.max_attempts {
                    metrics::counter!(telemetry::RETRIES_TOTAL, "operation" => operation.to_owned())
                        .increment(1);
                    let delay = config.delay_for_attempt(attempt);
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts = config.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                }
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }
    Err(last_err.unwrap_or(SaucierError::EmptyResponse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::new().initial_delay(Duration::from_millis(1))
    }

    #[test]
    fn delay_grows_and_caps() {
        let config = RetryConfig::new()
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_millis(300));
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(300));
    }

    #[test]
    fn max_attempts_never_zero() {
        assert_eq!(RetryConfig::new().max_attempts(0).max_attempts, 1);
        assert_eq!(RetryConfig::disabled().max_attempts, 1);
    }

    #[tokio::test]
    async fn retries_once_on_server_error() {
        let calls = AtomicU32::new(0);
        let result: Result<u32> = with_retry(&fast(), "test", || async {
            calls.fetch_add(1, Ordering::Relaxed);
            Err(SaucierError::Api {
                status: 502,
                message: "bad gateway".into(),
            })
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn recovers_on_second_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast(), "test", || async {
            if calls.fetch_add(1, Ordering::Relaxed) == 0 {
                Err(SaucierError::Timeout)
            } else {
                Ok(7)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32> = with_retry(&fast(), "test", || async {
            calls.fetch_add(1, Ordering::Relaxed);
            Err(SaucierError::NotFound("x".into()))
        })
        .await;
        assert!(matches!(result, Err(SaucierError::NotFound(_))));
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }
}
