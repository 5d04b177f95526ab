//! marketsweep-throttle
//!
//! Client-side pacing for rate-limited destination stores: a [`RateLimiter`]
//! combining a minimum inter-request interval with a sliding-window quota,
//! and a [`BatchProcessor`] that pushes items through it in paced batches.
//!
//! The limiter is deliberately conservative: decisions are serialized behind
//! one async lock held across the cooperative sleeps, so concurrent callers
//! line up single-file and the remote quota is never raced.
#![warn(missing_docs)]

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Pacing settings for one destination store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Target sustained request rate, in requests per second.
    pub target_rps: f64,
    /// Length of the sliding quota window.
    pub window: Duration,
    /// Requests allowed inside one window.
    pub window_limit: usize,
}

impl Default for ThrottleConfig {
    /// Defaults sized for a store quota of 2700 requests per 15 minutes,
    /// kept at 80% headroom.
    fn default() -> Self {
        Self {
            target_rps: 0.5,
            window: Duration::from_secs(15 * 60),
            window_limit: 2160,
        }
    }
}

impl ThrottleConfig {
    /// Minimum spacing between grants implied by `target_rps`.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        if self.target_rps > 0.0 && self.target_rps.is_finite() {
            Duration::from_secs_f64(1.0 / self.target_rps)
        } else {
            Duration::ZERO
        }
    }
}

/// A point-in-time view of limiter occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimiterStats {
    /// Grants still inside the window.
    pub requests_in_window: usize,
    /// Window capacity.
    pub window_limit: usize,
    /// `requests_in_window / window_limit`, in `[0, 1]`.
    pub utilization: f64,
    /// Configured target rate.
    pub target_rps: f64,
    /// Configured window length.
    pub window: Duration,
}

#[derive(Debug, Default)]
struct LimiterState {
    grants: VecDeque<Instant>,
    last_grant: Option<Instant>,
}

impl LimiterState {
    fn prune(&mut self, window: Duration, now: Instant) {
        while let Some(&oldest) = self.grants.front() {
            if now.duration_since(oldest) >= window {
                self.grants.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Dual-constraint rate limiter: minimum spacing plus a sliding-window quota.
///
/// `acquire` blocks cooperatively until a request may proceed. The internal
/// lock stays held across the sleeps, which serializes all callers and keeps
/// the interval math sound single-file.
#[derive(Debug)]
pub struct RateLimiter {
    config: ThrottleConfig,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Limiter with the given pacing settings.
    #[must_use]
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState::default()),
        }
    }

    /// Pacing settings this limiter enforces.
    #[must_use]
    pub const fn config(&self) -> &ThrottleConfig {
        &self.config
    }

    /// Wait until one request may proceed, then record its grant.
    ///
    /// Enforces the minimum spacing since the previous grant first, then the
    /// window quota: when the window is full, sleeps exactly until the oldest
    /// in-window grant expires before re-checking.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;

        let interval = self.config.min_interval();
        if let Some(last) = state.last_grant {
            let since = last.elapsed();
            if since < interval {
                tokio::time::sleep(interval - since).await;
            }
        }

        loop {
            let now = Instant::now();
            state.prune(self.config.window, now);
            if state.grants.len() < self.config.window_limit {
                break;
            }
            if let Some(&oldest) = state.grants.front() {
                let until_free = (oldest + self.config.window).duration_since(now);
                debug!(
                    in_window = state.grants.len(),
                    sleep_ms = until_free.as_millis() as u64,
                    "request window saturated, waiting for oldest grant to expire"
                );
                tokio::time::sleep(until_free).await;
            }
        }

        let granted = Instant::now();
        state.grants.push_back(granted);
        state.last_grant = Some(granted);
    }

    /// Current occupancy, pruned as of now.
    pub async fn stats(&self) -> RateLimiterStats {
        let mut state = self.state.lock().await;
        state.prune(self.config.window, Instant::now());
        let in_window = state.grants.len();
        let utilization = if self.config.window_limit == 0 {
            1.0
        } else {
            in_window as f64 / self.config.window_limit as f64
        };
        RateLimiterStats {
            requests_in_window: in_window,
            window_limit: self.config.window_limit,
            utilization,
            target_rps: self.config.target_rps,
            window: self.config.window,
        }
    }
}

/// Pushes a sequence of items through a [`RateLimiter`] in fixed-size
/// batches, pausing between batches.
///
/// Items inside a batch run sequentially, each behind one `acquire`;
/// a failing item becomes an `Err` entry in the output instead of
/// aborting the batch.
#[derive(Debug)]
pub struct BatchProcessor<'a> {
    limiter: &'a RateLimiter,
    batch_size: usize,
    batch_delay: Duration,
}

impl<'a> BatchProcessor<'a> {
    /// Default batch shape: 10 items per batch, 1 second between batches.
    #[must_use]
    pub fn new(limiter: &'a RateLimiter) -> Self {
        Self {
            limiter,
            batch_size: 10,
            batch_delay: Duration::from_secs(1),
        }
    }

    /// Set the number of items per batch (minimum 1).
    #[must_use]
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the pause between batches.
    #[must_use]
    pub const fn batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    /// Run `op` over every item, rate-limited, collecting per-item results
    /// in input order.
    pub async fn process<T, R, E, F, Fut>(&self, items: Vec<T>, mut op: F) -> Vec<Result<R, E>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let total = items.len();
        let mut results = Vec::with_capacity(total);
        let mut iter = items.into_iter();

        loop {
            let batch: Vec<T> = iter.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            for item in batch {
                self.limiter.acquire().await;
                results.push(op(item).await);
            }
            if results.len() < total {
                debug!(
                    done = results.len(),
                    total,
                    "batch complete, pausing before the next"
                );
                tokio::time::sleep(self.batch_delay).await;
            }
        }
        results
    }
}
