//! Per-exchange collection results and run-level aggregates.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{Candle, OrderBook, Ticker, Trade};
use crate::kind::DataKind;
use crate::market::{ExchangeInfo, ExchangeStatus};
use crate::symbol::{ExchangeId, Symbol, Timeframe};

/// Where inside a collection run an error was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Connection setup or market loading failed.
    Initialization,
    /// A ticker fetch failed after retries.
    Ticker,
    /// An order-book fetch failed after retries.
    OrderBook,
    /// A trades fetch failed after retries.
    Trades,
    /// A candle fetch failed after retries.
    Ohlcv,
    /// The whole exchange task failed outside the collector (panic or
    /// missing client); synthesized by the manager.
    CollectionFailed,
    /// Anything that does not fit the categories above.
    General,
}

impl From<DataKind> for ErrorKind {
    fn from(kind: DataKind) -> Self {
        match kind {
            DataKind::Ticker => Self::Ticker,
            DataKind::OrderBook => Self::OrderBook,
            DataKind::Trades => Self::Trades,
            DataKind::Ohlcv => Self::Ohlcv,
        }
    }
}

/// One captured failure inside a collection run.
///
/// Errors are accumulated, never propagated: a fetch that exhausts its
/// retries becomes one of these on the owning [`CollectedData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Symbol the operation targeted, when applicable.
    pub symbol: Option<Symbol>,
    /// Timeframe for OHLCV failures.
    pub timeframe: Option<Timeframe>,
    /// Human-readable failure description.
    pub message: String,
    /// When the failure was recorded.
    pub timestamp: DateTime<Utc>,
}

impl CollectionError {
    /// Error not tied to any symbol (initialization, task failure).
    #[must_use]
    pub fn exchange_level(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            symbol: None,
            timeframe: None,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Error from a per-symbol fetch operation.
    #[must_use]
    pub fn fetch(
        kind: ErrorKind,
        symbol: Symbol,
        timeframe: Option<Timeframe>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            symbol: Some(symbol),
            timeframe,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Everything one exchange produced during a single collection run.
///
/// Owned exclusively by its collector while collecting and handed to the
/// manager by value on completion. Append order of the record vectors is
/// fetch-completion order and carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectedData {
    /// Exchange this data came from.
    pub exchange: ExchangeId,
    /// When collection for this exchange started.
    pub collection_timestamp: DateTime<Utc>,

    /// Ticker snapshots.
    pub tickers: Vec<Ticker>,
    /// Order-book snapshots.
    pub order_books: Vec<OrderBook>,
    /// Recent trades, flattened across symbols.
    pub trades: Vec<Trade>,
    /// Candles, flattened across symbols and timeframes.
    pub candles: Vec<Candle>,

    /// Exchange status snapshot, when collected.
    pub exchange_status: Option<ExchangeStatus>,
    /// Exchange metadata, when initialization succeeded.
    pub exchange_info: Option<ExchangeInfo>,

    /// Failures accumulated during the run.
    pub errors: Vec<CollectionError>,
    /// Non-fatal notices (unresolved symbols, skipped status).
    pub warnings: Vec<String>,
}

impl CollectedData {
    /// Empty result for an exchange, stamped now.
    #[must_use]
    pub fn new(exchange: ExchangeId) -> Self {
        Self {
            exchange,
            collection_timestamp: Utc::now(),
            tickers: Vec::new(),
            order_books: Vec::new(),
            trades: Vec::new(),
            candles: Vec::new(),
            exchange_status: None,
            exchange_info: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Total records across all data kinds.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.tickers.len() + self.order_books.len() + self.trades.len() + self.candles.len()
    }

    /// Whether any failure was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// The complete, immutable result of one `collect_all` invocation.
///
/// Holds exactly one [`CollectedData`] per requested (deduplicated)
/// exchange; an exchange that failed outright still appears, with an
/// error-only entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRun {
    /// Per-exchange results.
    pub exchanges: HashMap<ExchangeId, CollectedData>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the last exchange task finished.
    pub finished_at: DateTime<Utc>,
}

impl CollectionRun {
    /// Number of exchanges in the run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// Whether the run covers no exchanges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Result for one exchange.
    #[must_use]
    pub fn get(&self, exchange: &ExchangeId) -> Option<&CollectedData> {
        self.exchanges.get(exchange)
    }
}
