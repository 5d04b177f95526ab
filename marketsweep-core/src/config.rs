//! Collection configuration.
//!
//! Plain serializable settings with sensible defaults; validation that can
//! fail happens at builder time in the engine crate, not here.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::symbol::{ExchangeId, Symbol, Timeframe};

/// Pairs collected when no symbol list is configured.
pub const DEFAULT_SYMBOLS: [&str; 6] = [
    "BTC/USDT",
    "ETH/USDT",
    "BTC/USD",
    "ETH/USD",
    "BTC/JPY",
    "ETH/JPY",
];

/// Timeframes collected when none are configured.
pub const DEFAULT_TIMEFRAMES: [Timeframe; 6] = [
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::H1,
    Timeframe::H4,
    Timeframe::D1,
];

/// Retry behavior for a single fetch operation.
///
/// Delay before attempt `n + 1` is `multiplier * 2^(n-1)` clamped to
/// `[min_backoff, max_backoff]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first (0 means one attempt, no retry).
    pub max_attempts: u32,
    /// Exponential base delay.
    pub multiplier: Duration,
    /// Lower clamp on the computed delay.
    pub min_backoff: Duration,
    /// Upper clamp on the computed delay.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Delay to sleep after failed attempt `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(32);
        let raw = self.multiplier.saturating_mul(1u32 << exp.min(31));
        raw.clamp(self.min_backoff, self.max_backoff)
    }
}

/// Per-exchange overrides for fetch parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOverrides {
    /// Order-book depth for this exchange.
    pub orderbook_depth: Option<u32>,
    /// Trades-per-symbol limit for this exchange.
    pub trades_limit: Option<u32>,
    /// Candles-per-series limit for this exchange.
    pub candles_limit: Option<u32>,
}

/// What one collector fetches from its exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Pairs to collect, in the canonical slash spelling.
    pub symbols: Vec<Symbol>,

    /// Collect ticker snapshots.
    pub collect_ticker: bool,
    /// Collect order-book snapshots.
    pub collect_order_book: bool,
    /// Collect recent trades.
    pub collect_trades: bool,
    /// Collect candles.
    pub collect_ohlcv: bool,
    /// Fetch the exchange status page once per run.
    pub collect_status: bool,

    /// Candle timeframes to request, filtered per exchange support.
    pub timeframes: Vec<Timeframe>,
    /// Order-book depth per snapshot.
    pub orderbook_depth: u32,
    /// Trades fetched per symbol.
    pub trades_limit: u32,
    /// Candles fetched per (symbol, timeframe).
    pub candles_limit: u32,

    /// Cap on concurrent operations within one exchange. `None` leaves the
    /// fan-out unbounded; the manager's semaphore is then the only width
    /// control.
    pub max_parallel_ops: Option<usize>,

    /// Per-exchange parameter overrides.
    pub overrides: HashMap<ExchangeId, ExchangeOverrides>,

    /// Retry behavior for each fetch operation.
    pub retry: RetryConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| Symbol::new(*s)).collect(),
            collect_ticker: true,
            collect_order_book: true,
            collect_trades: true,
            collect_ohlcv: true,
            collect_status: true,
            timeframes: DEFAULT_TIMEFRAMES.to_vec(),
            orderbook_depth: 20,
            trades_limit: 50,
            candles_limit: 100,
            max_parallel_ops: None,
            overrides: HashMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Order-book depth for an exchange, honoring overrides.
    #[must_use]
    pub fn orderbook_depth_for(&self, exchange: &ExchangeId) -> u32 {
        self.overrides
            .get(exchange)
            .and_then(|o| o.orderbook_depth)
            .unwrap_or(self.orderbook_depth)
    }

    /// Trades limit for an exchange, honoring overrides.
    #[must_use]
    pub fn trades_limit_for(&self, exchange: &ExchangeId) -> u32 {
        self.overrides
            .get(exchange)
            .and_then(|o| o.trades_limit)
            .unwrap_or(self.trades_limit)
    }

    /// Candles limit for an exchange, honoring overrides.
    #[must_use]
    pub fn candles_limit_for(&self, exchange: &ExchangeId) -> u32 {
        self.overrides
            .get(exchange)
            .and_then(|o| o.candles_limit)
            .unwrap_or(self.candles_limit)
    }
}

/// Cross-exchange scheduling settings for the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Exchanges collected concurrently at most.
    pub max_concurrent: usize,
    /// Exchanges attempted first when the list comes from the catalog.
    /// Ordering hint only.
    pub priority_exchanges: Vec<ExchangeId>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            priority_exchanges: Vec::new(),
        }
    }
}
