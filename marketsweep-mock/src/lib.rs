//! Deterministic mock exchange clients for tests and CI-safe examples.
//!
//! `MockExchange` is a scripted [`ExchangeClient`]: tests enable or disable
//! capabilities, inject canned values or closures per data kind, force
//! initialization failures, and read back call counts and concurrency gauges
//! through the shared [`MockStats`].

#![allow(clippy::type_complexity)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use marketsweep_core::{
    Candle, CatalogProvider, ExchangeClient, ExchangeHealth, ExchangeId, ExchangeStatus,
    MarketCatalog, MarketInfo, OhlcvSource, OrderBook, OrderBookSource, StatusSource, SweepError,
    Symbol, Ticker, TickerSource, Timeframe, Trade, TradesSource,
};

const DEFAULT_TIMEFRAMES: &[Timeframe] = &[
    Timeframe::M1,
    Timeframe::M5,
    Timeframe::M15,
    Timeframe::H1,
    Timeframe::H4,
    Timeframe::D1,
];

/// Call counters and concurrency gauges shared between a mock and its test.
#[derive(Debug, Default)]
pub struct MockStats {
    pub init_calls: AtomicU32,
    pub close_calls: AtomicU32,
    pub ticker_calls: AtomicU32,
    pub order_book_calls: AtomicU32,
    pub trades_calls: AtomicU32,
    pub candles_calls: AtomicU32,
    pub status_calls: AtomicU32,

    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl MockStats {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Highest number of clients simultaneously between `initialize` and
    /// `close`. Tests use this to observe the manager's concurrency bound.
    #[must_use]
    pub fn max_concurrent_observed(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

type TickerFn = Arc<dyn Fn(&Symbol) -> Result<Ticker, SweepError> + Send + Sync>;
type OrderBookFn = Arc<dyn Fn(&Symbol, u32) -> Result<OrderBook, SweepError> + Send + Sync>;
type TradesFn = Arc<dyn Fn(&Symbol, u32) -> Result<Vec<Trade>, SweepError> + Send + Sync>;
type CandlesFn =
    Arc<dyn Fn(&Symbol, Timeframe, u32) -> Result<Vec<Candle>, SweepError> + Send + Sync>;

/// Scripted in-memory exchange client.
///
/// Defaults to every capability enabled with deterministic canned data for
/// the markets passed to [`MockExchange::new`].
pub struct MockExchange {
    pub id: ExchangeId,
    pub market_symbols: Vec<Symbol>,
    pub timeframes: Vec<Timeframe>,

    /// Error returned by `initialize` instead of loading markets.
    pub init_error: Option<SweepError>,
    /// Latency applied to every fetch call.
    pub delay: Option<Duration>,

    pub has_ticker: bool,
    pub has_order_book: bool,
    pub has_trades: bool,
    pub has_ohlcv: bool,
    pub has_status: bool,

    /// Error returned by every status call.
    pub status_error: Option<SweepError>,

    // Optional closures to customize behavior per test
    pub ticker_fn: Option<TickerFn>,
    pub order_book_fn: Option<OrderBookFn>,
    pub trades_fn: Option<TradesFn>,
    pub candles_fn: Option<CandlesFn>,

    pub stats: Arc<MockStats>,

    catalog: MarketCatalog,
    ticker_failures_left: AtomicU32,
}

impl MockExchange {
    /// Mock with every capability enabled and the given markets listed.
    #[must_use]
    pub fn new(id: impl Into<String>, markets: &[&str]) -> Self {
        Self {
            id: ExchangeId::new(id),
            market_symbols: markets.iter().map(|s| Symbol::new(*s)).collect(),
            timeframes: DEFAULT_TIMEFRAMES.to_vec(),
            init_error: None,
            delay: None,
            has_ticker: true,
            has_order_book: true,
            has_trades: true,
            has_ohlcv: true,
            has_status: true,
            status_error: None,
            ticker_fn: None,
            order_book_fn: None,
            trades_fn: None,
            candles_fn: None,
            stats: MockStats::new(),
            catalog: MarketCatalog::default(),
            ticker_failures_left: AtomicU32::new(0),
        }
    }

    /// Share call counters with the test.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<MockStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Make `initialize` fail with the given error.
    #[must_use]
    pub fn failing_init(mut self, error: SweepError) -> Self {
        self.init_error = Some(error);
        self
    }

    /// Fail the first `n` ticker calls with a transient error, then succeed.
    #[must_use]
    pub fn ticker_fails_first(mut self, n: u32) -> Self {
        self.ticker_failures_left = AtomicU32::new(n);
        self
    }

    /// Apply the given latency to every fetch call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn canned_ticker(&self, symbol: &Symbol) -> Ticker {
        Ticker {
            exchange: self.id.clone(),
            symbol: symbol.clone(),
            timestamp: Utc::now(),
            last: Some(50_000.0),
            bid: Some(49_990.0),
            ask: Some(50_010.0),
            high: Some(51_000.0),
            low: Some(49_000.0),
            open: Some(49_500.0),
            close: Some(50_000.0),
            base_volume: Some(1_234.5),
            quote_volume: Some(61_725_000.0),
            percentage: Some(1.01),
            change: Some(500.0),
            vwap: None,
            bid_volume: None,
            ask_volume: None,
        }
    }

    fn canned_trade(&self, symbol: &Symbol, n: u32) -> Trade {
        Trade {
            exchange: self.id.clone(),
            symbol: symbol.clone(),
            timestamp: Utc::now(),
            trade_id: Some(format!("t-{n}")),
            price: 50_000.0 + f64::from(n),
            amount: 0.1,
            cost: Some((50_000.0 + f64::from(n)) * 0.1),
            side: None,
            taker_or_maker: None,
        }
    }

    fn canned_candle(&self, symbol: &Symbol, timeframe: Timeframe, n: u32) -> Candle {
        let base = 50_000.0 + f64::from(n);
        Candle {
            exchange: self.id.clone(),
            symbol: symbol.clone(),
            timeframe,
            timestamp: Utc::now(),
            open: base,
            high: base + 100.0,
            low: base - 100.0,
            close: base + 50.0,
            volume: 10.0,
        }
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    fn exchange(&self) -> &ExchangeId {
        &self.id
    }

    async fn initialize(&mut self) -> Result<(), SweepError> {
        self.stats.init_calls.fetch_add(1, Ordering::SeqCst);
        self.stats.enter();
        if let Some(error) = &self.init_error {
            return Err(error.clone());
        }
        self.catalog = MarketCatalog::new(
            self.market_symbols
                .iter()
                .map(|s| MarketInfo::listed(s.clone())),
        );
        Ok(())
    }

    fn markets(&self) -> &MarketCatalog {
        &self.catalog
    }

    fn as_ticker_source(&self) -> Option<&dyn TickerSource> {
        self.has_ticker.then_some(self as &dyn TickerSource)
    }

    fn as_order_book_source(&self) -> Option<&dyn OrderBookSource> {
        self.has_order_book.then_some(self as &dyn OrderBookSource)
    }

    fn as_trades_source(&self) -> Option<&dyn TradesSource> {
        self.has_trades.then_some(self as &dyn TradesSource)
    }

    fn as_ohlcv_source(&self) -> Option<&dyn OhlcvSource> {
        self.has_ohlcv.then_some(self as &dyn OhlcvSource)
    }

    fn as_status_source(&self) -> Option<&dyn StatusSource> {
        self.has_status.then_some(self as &dyn StatusSource)
    }

    async fn close(&mut self) {
        self.stats.close_calls.fetch_add(1, Ordering::SeqCst);
        self.stats.exit();
    }
}

#[async_trait]
impl TickerSource for MockExchange {
    async fn ticker(&self, symbol: &Symbol) -> Result<Ticker, SweepError> {
        self.stats.ticker_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Ok(left) = self
            .ticker_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| v.checked_sub(1))
        {
            return Err(SweepError::Network(format!(
                "scripted ticker failure ({left} left)"
            )));
        }
        match &self.ticker_fn {
            Some(f) => f(symbol),
            None => Ok(self.canned_ticker(symbol)),
        }
    }
}

#[async_trait]
impl OrderBookSource for MockExchange {
    async fn order_book(&self, symbol: &Symbol, depth: u32) -> Result<OrderBook, SweepError> {
        self.stats.order_book_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(f) = &self.order_book_fn {
            return f(symbol, depth);
        }
        let levels = depth.min(5) as usize;
        let bids = (0..levels)
            .map(|i| marketsweep_core::BookLevel {
                price: 49_990.0 - i as f64 * 10.0,
                amount: 1.0,
            })
            .collect();
        let asks = (0..levels)
            .map(|i| marketsweep_core::BookLevel {
                price: 50_010.0 + i as f64 * 10.0,
                amount: 1.0,
            })
            .collect();
        Ok(OrderBook::from_levels(
            self.id.clone(),
            symbol.clone(),
            Utc::now(),
            bids,
            asks,
        ))
    }
}

#[async_trait]
impl TradesSource for MockExchange {
    async fn trades(&self, symbol: &Symbol, limit: u32) -> Result<Vec<Trade>, SweepError> {
        self.stats.trades_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(f) = &self.trades_fn {
            return f(symbol, limit);
        }
        Ok((0..limit.min(3))
            .map(|n| self.canned_trade(symbol, n))
            .collect())
    }
}

#[async_trait]
impl OhlcvSource for MockExchange {
    async fn candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: u32,
    ) -> Result<Vec<Candle>, SweepError> {
        self.stats.candles_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if let Some(f) = &self.candles_fn {
            return f(symbol, timeframe, limit);
        }
        Ok((0..limit.min(3))
            .map(|n| self.canned_candle(symbol, timeframe, n))
            .collect())
    }

    fn supported_timeframes(&self) -> &[Timeframe] {
        &self.timeframes
    }
}

#[async_trait]
impl StatusSource for MockExchange {
    async fn status(&self) -> Result<ExchangeStatus, SweepError> {
        self.stats.status_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.status_error {
            return Err(error.clone());
        }
        Ok(ExchangeStatus {
            exchange: self.id.clone(),
            timestamp: Utc::now(),
            status: ExchangeHealth::Ok,
            updated: None,
            eta: None,
            url: None,
        })
    }
}

type ClientFactory = Box<dyn Fn() -> Box<dyn ExchangeClient> + Send + Sync>;

/// In-memory [`CatalogProvider`] mapping exchange ids to client factories.
///
/// Each `connect` call invokes the factory, so every collector gets a fresh,
/// exclusively-owned client.
#[derive(Default)]
pub struct MockCatalog {
    factories: HashMap<ExchangeId, ClientFactory>,
    order: Vec<ExchangeId>,
}

impl MockCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for one exchange, preserving registration order.
    #[must_use]
    pub fn register<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ExchangeClient> + Send + Sync + 'static,
    {
        let id = ExchangeId::new(id);
        if !self.order.contains(&id) {
            self.order.push(id.clone());
        }
        self.factories.insert(id, Box::new(factory));
        self
    }
}

impl CatalogProvider for MockCatalog {
    fn exchanges(&self) -> Vec<ExchangeId> {
        self.order.clone()
    }

    fn connect(&self, exchange: &ExchangeId) -> Option<Box<dyn ExchangeClient>> {
        self.factories.get(exchange).map(|factory| factory())
    }
}
