//! Retry loop with linear backoff.
//!
//! Only failures that report themselves as [`Retryable`] are repeated; every
//! other error is returned on the spot without consuming attempts. Attempt
//! `n` is followed by a wait of `n × base_delay_ms`, capped at `max_delay_ms`.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::errors::SiteError;

/// Errors that know whether repeating the operation could help.
pub trait Retryable {
    /// Whether the failed operation may be repeated.
    fn is_retryable(&self) -> bool;
}

impl Retryable for SiteError {
    fn is_retryable(&self) -> bool {
        SiteError::is_retryable(self)
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first one.
    pub max_attempts: usize,
    /// Backoff unit in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum attempts. At least one attempt is always made.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the backoff unit.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub fn with_max_delay_ms(mut self, delay: u64) -> Self {
        self.max_delay_ms = delay;
        self
    }

    /// Wait after `failed` failed attempts.
    #[must_use]
    pub fn delay_after(&self, failed: usize) -> Duration {
        let failed = u64::try_from(failed.max(1)).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(failed).min(self.max_delay_ms))
    }
}

/// Outcome of a retry decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry(Duration),
    /// No more retries, give up.
    GiveUp,
    /// Don't retry, the error is not retryable.
    NotRetryable,
}

/// Decides what to do after `attempt` attempts, the last of which failed.
#[must_use]
pub fn should_retry(attempt: usize, config: &RetryConfig, retryable: bool) -> RetryDecision {
    if !retryable {
        return RetryDecision::NotRetryable;
    }
    if attempt >= config.max_attempts.max(1) {
        return RetryDecision::GiveUp;
    }
    RetryDecision::Retry(config.delay_after(attempt))
}

/// Executes an operation with retry logic.
///
/// `key` identifies the operation in logs (the request URL for fetches).
pub async fn with_retry<T, E, F, Fut>(
    config: &RetryConfig,
    key: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + Retryable,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => match should_retry(attempt, config, e.is_retryable()) {
                RetryDecision::Retry(delay) => {
                    tracing::warn!(
                        key = %key,
                        attempt,
                        max_attempts = config.max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    tracing::warn!(
                        key = %key,
                        attempts = attempt,
                        error = %e,
                        "Request failed, attempts exhausted"
                    );
                    return Err(e);
                }
                RetryDecision::NotRetryable => return Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct TestError {
        transient: bool,
    }

    impl Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "transient={}", self.transient)
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.transient
        }
    }

    fn fast(attempts: usize) -> RetryConfig {
        RetryConfig::new().with_max_attempts(attempts).with_base_delay_ms(1)
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.max_delay_ms, 30000);
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(RetryConfig::new().with_max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_linear_delay_grows_by_base() {
        let config = RetryConfig::new().with_base_delay_ms(1000);
        assert_eq!(config.delay_after(1), Duration::from_secs(1));
        assert_eq!(config.delay_after(2), Duration::from_secs(2));
        assert_eq!(config.delay_after(3), Duration::from_secs(3));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let config = RetryConfig::new().with_base_delay_ms(1000).with_max_delay_ms(5000);
        assert_eq!(config.delay_after(11), Duration::from_millis(5000));
    }

    #[test]
    fn test_should_retry_decisions() {
        let config = fast(2);
        assert!(matches!(should_retry(1, &config, true), RetryDecision::Retry(_)));
        assert_eq!(should_retry(1, &config, false), RetryDecision::NotRetryable);
        assert_eq!(should_retry(2, &config, true), RetryDecision::GiveUp);
    }

    #[tokio::test]
    async fn test_with_retry_success_on_last_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<&str, TestError> = with_retry(&fast(3), "test", || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(TestError { transient: true })
                } else {
                    Ok("body")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("body"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_exhausts_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<(), TestError> = with_retry(&fast(3), "test", || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError { transient: true }) }
        })
        .await;

        assert_eq!(result, Err(TestError { transient: true }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_stops_on_permanent_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result: Result<(), TestError> = with_retry(&fast(5), "test", || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(TestError { transient: false }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
