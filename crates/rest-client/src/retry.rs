//! Bounded retry of whole request attempts.

pub use common::DEFAULT_MAX_ATTEMPTS;

use common::ExponentialBackoff;
use std::future::Future;

/// How many times a request is attempted and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Option<ExponentialBackoff>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: None,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` total attempts (at least one) and no delay.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: None,
        }
    }

    /// Wait according to `backoff` between attempts.
    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last error is returned on exhaustion.
    ///
    /// `op` receives the 1-based attempt number and must rebuild everything
    /// that is attempt specific.
    pub async fn run<T, E, F, Fut>(
        &self,
        mut op: F,
        is_retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut backoff = self.backoff.clone();
        if let Some(b) = backoff.as_mut() {
            b.reset();
        }

        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Request attempt failed, retrying"
                    );
                    if let Some(b) = backoff.as_mut() {
                        tokio::time::sleep(b.next_delay()).await;
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RestError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<(), RestError> = policy
            .run(
                |attempt| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Err(RestError::Connection(format!("attempt {attempt}"))) }
                },
                RestError::is_retryable,
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(RestError::Connection(msg)) => assert_eq!(msg, "attempt 3"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stops_on_first_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result = policy
            .run(
                |attempt| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if attempt < 2 {
                            Err(RestError::Timeout)
                        } else {
                            Ok(attempt)
                        }
                    }
                },
                RestError::is_retryable,
            )
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let result: Result<(), RestError> = policy
            .run(
                |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(RestError::RequestBuild("bad header".into())) }
                },
                RestError::is_retryable,
            )
            .await;

        assert!(matches!(result, Err(RestError::RequestBuild(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_between_attempts() {
        let policy = RetryPolicy::new(3).with_backoff(ExponentialBackoff::without_jitter(
            Duration::from_secs(1),
            Duration::from_secs(10),
        ));
        let started = tokio::time::Instant::now();

        let result: Result<(), RestError> = policy
            .run(|_| async { Err(RestError::Timeout) }, RestError::is_retryable)
            .await;

        assert!(result.is_err());
        // 1s after the first failure, 2s after the second.
        assert!(started.elapsed() >= Duration::from_secs(3));
    }
}
