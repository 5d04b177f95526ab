//! The exchange connector contract.
//!
//! An [`ExchangeClient`] is the primary object-safe trait exchange adapters
//! implement; capabilities are focused role traits exposed through `as_*`
//! accessors that default to `None`. A capability exists iff the accessor
//! returns `Some`; there is no separate feature registry to keep in sync.

use async_trait::async_trait;

use crate::config::ManagerConfig;
use crate::data::{Candle, OrderBook, Ticker, Trade};
use crate::error::SweepError;
use crate::kind::DataKind;
use crate::market::{CapabilitySet, ExchangeInfo, ExchangeStatus, MarketCatalog};
use crate::symbol::{ExchangeId, Symbol, Timeframe};

/// Role trait for clients that serve ticker snapshots.
#[async_trait]
pub trait TickerSource: Send + Sync {
    /// Fetch a point-in-time ticker for the given symbol.
    async fn ticker(&self, symbol: &Symbol) -> Result<Ticker, SweepError>;
}

/// Role trait for clients that serve order-book depth.
#[async_trait]
pub trait OrderBookSource: Send + Sync {
    /// Fetch an order-book snapshot limited to `depth` levels per side.
    async fn order_book(&self, symbol: &Symbol, depth: u32) -> Result<OrderBook, SweepError>;
}

/// Role trait for clients that serve recent trades.
#[async_trait]
pub trait TradesSource: Send + Sync {
    /// Fetch up to `limit` recent trades for the given symbol.
    async fn trades(&self, symbol: &Symbol, limit: u32) -> Result<Vec<Trade>, SweepError>;
}

/// Role trait for clients that serve candlestick series.
#[async_trait]
pub trait OhlcvSource: Send + Sync {
    /// Fetch up to `limit` candles for the given symbol and timeframe.
    async fn candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: u32,
    ) -> Result<Vec<Candle>, SweepError>;

    /// REQUIRED: exact timeframes this client can natively serve.
    fn supported_timeframes(&self) -> &[Timeframe];
}

/// Role trait for clients that serve an exchange status page.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the exchange's current operational status.
    async fn status(&self) -> Result<ExchangeStatus, SweepError>;
}

/// One exchange connection's full surface.
///
/// A client is handed to exactly one collector at a time and accessed
/// exclusively; `initialize` and `close` bracket every collection run.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Identifier of the exchange this client talks to.
    fn exchange(&self) -> &ExchangeId;

    /// Open the connection and load the market catalog.
    ///
    /// Not retried by callers; a failure here fails the whole exchange.
    async fn initialize(&mut self) -> Result<(), SweepError>;

    /// Markets loaded by [`initialize`](Self::initialize). Empty before
    /// initialization.
    fn markets(&self) -> &MarketCatalog;

    /// Capability metadata for this exchange.
    fn info(&self) -> ExchangeInfo {
        ExchangeInfo {
            name: self.exchange().clone(),
            countries: Vec::new(),
            capabilities: self.capabilities(),
            timeframes: self
                .as_ohlcv_source()
                .map(|s| s.supported_timeframes().to_vec())
                .unwrap_or_default(),
            rate_limit_ms: None,
        }
    }

    /// Ticker capability, when present.
    fn as_ticker_source(&self) -> Option<&dyn TickerSource> {
        None
    }

    /// Order-book capability, when present.
    fn as_order_book_source(&self) -> Option<&dyn OrderBookSource> {
        None
    }

    /// Recent-trades capability, when present.
    fn as_trades_source(&self) -> Option<&dyn TradesSource> {
        None
    }

    /// Candle capability, when present.
    fn as_ohlcv_source(&self) -> Option<&dyn OhlcvSource> {
        None
    }

    /// Status-page capability, when present.
    fn as_status_source(&self) -> Option<&dyn StatusSource> {
        None
    }

    /// Whether the given data kind is available, derived from the accessors.
    fn supports(&self, kind: DataKind) -> bool {
        match kind {
            DataKind::Ticker => self.as_ticker_source().is_some(),
            DataKind::OrderBook => self.as_order_book_source().is_some(),
            DataKind::Trades => self.as_trades_source().is_some(),
            DataKind::Ohlcv => self.as_ohlcv_source().is_some(),
        }
    }

    /// Capability map derived from the accessors.
    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet {
            ticker: self.as_ticker_source().is_some(),
            bulk_tickers: false,
            order_book: self.as_order_book_source().is_some(),
            trades: self.as_trades_source().is_some(),
            ohlcv: self.as_ohlcv_source().is_some(),
        }
    }

    /// Release the connection. Idempotent; called on every exit path.
    async fn close(&mut self);
}

/// Source of exchange clients for the manager.
///
/// `exchanges` is an immutable snapshot at call time; `connect` hands out a
/// fresh, exclusively-owned client per call, so concurrent collectors never
/// share a connection.
pub trait CatalogProvider: Send + Sync {
    /// Identifiers of every exchange this catalog can connect.
    fn exchanges(&self) -> Vec<ExchangeId>;

    /// Build a client for the given exchange, or `None` when unknown.
    fn connect(&self, exchange: &ExchangeId) -> Option<Box<dyn ExchangeClient>>;
}

/// Reorder `exchanges` so entries from the configured priority list come
/// first, preserving relative order inside each group. Ordering hint only.
#[must_use]
pub fn prioritize(exchanges: Vec<ExchangeId>, config: &ManagerConfig) -> Vec<ExchangeId> {
    if config.priority_exchanges.is_empty() {
        return exchanges;
    }
    let (mut first, rest): (Vec<_>, Vec<_>) = exchanges
        .into_iter()
        .partition(|e| config.priority_exchanges.contains(e));
    first.sort_by_key(|e| {
        config
            .priority_exchanges
            .iter()
            .position(|p| p == e)
            .unwrap_or(usize::MAX)
    });
    first.extend(rest);
    first
}
