//! Retry policy for outbound provider calls

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::ProviderError;

/// Linear-backoff retry policy for retryable provider failures
///
/// Attempt `n` (1-based) sleeps `base_delay * n` before retrying. Only
/// rate limits and transport errors are retried; everything else is
/// returned to the caller on the first occurrence.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.base_delay * attempt;
                    warn!(attempt, delay_ms = delay.as_millis() as u64, error = %err, "provider call failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_retryable_failures() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ProviderError::RateLimited("slow down".into()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_fail_fast() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::QuotaExhausted("no credit".into())) }
            })
            .await;

        assert!(matches!(result, Err(ProviderError::QuotaExhausted(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_attempts_exhausted() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProviderError::Transport("reset".into())) }
            })
            .await;

        assert!(matches!(result, Err(ProviderError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
