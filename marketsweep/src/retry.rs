//! Retry wrapper for individual fetch operations.

use std::future::Future;

use marketsweep_core::{RetryConfig, SweepError};
use tracing::debug;

/// Retries an async operation with clamped exponential backoff.
///
/// Every error is retried by default; a classifier narrows that to fail
/// fast on errors retrying cannot fix (such as invalid arguments).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    config: RetryConfig,
    classify: fn(&SweepError) -> bool,
}

impl RetryPolicy {
    /// Policy that retries every error per the given backoff settings.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            classify: |_| true,
        }
    }

    /// Replace the retryability classifier. An error the classifier rejects
    /// is returned immediately, without sleeping.
    #[must_use]
    pub fn with_classifier(mut self, classify: fn(&SweepError) -> bool) -> Self {
        self.classify = classify;
        self
    }

    /// Run `op` until it succeeds, exhausts `max_attempts`, or produces a
    /// non-retryable error. Returns the last error on failure.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, SweepError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SweepError>>,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= max_attempts || !(self.classify)(&err) => return Err(err),
                Err(err) => {
                    let delay = self.config.backoff(attempt);
                    debug!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "fetch attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
