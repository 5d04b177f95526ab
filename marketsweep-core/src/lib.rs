//! marketsweep-core
//!
//! Shared types and the exchange connector contract for the marketsweep
//! collection engine.
//!
//! - `client`: the [`ExchangeClient`] trait, its capability role traits, and
//!   the [`CatalogProvider`] collaborator the engine draws clients from.
//! - `data`: normalized market-data records (tickers, order books, trades,
//!   candles).
//! - `market`: market catalogs, symbol resolution, and exchange metadata.
//! - `collected`: per-exchange run results and the accumulated error model.
//! - `config`: collector, manager, and retry settings.
//!
//! All async surfaces assume a Tokio 1.x runtime.
#![warn(missing_docs)]

/// The `ExchangeClient` trait, capability role traits, and `CatalogProvider`.
pub mod client;
/// Per-exchange collection results and run-level aggregates.
pub mod collected;
/// Collection configuration.
pub mod config;
/// Normalized market-data records.
pub mod data;
/// The unified error type.
pub mod error;
/// Data-kind enumeration.
pub mod kind;
/// Market catalogs and exchange metadata.
pub mod market;
/// Exchange, symbol, and timeframe identifiers.
pub mod symbol;

pub use client::{
    CatalogProvider, ExchangeClient, OhlcvSource, OrderBookSource, StatusSource, TickerSource,
    TradesSource, prioritize,
};
pub use collected::{CollectedData, CollectionError, CollectionRun, ErrorKind};
pub use config::{
    CollectorConfig, DEFAULT_SYMBOLS, DEFAULT_TIMEFRAMES, ExchangeOverrides, ManagerConfig,
    RetryConfig,
};
pub use data::{BookLevel, Candle, LiquidityRole, OrderBook, Ticker, Trade, TradeSide};
pub use error::SweepError;
pub use kind::DataKind;
pub use market::{
    CapabilitySet, ExchangeHealth, ExchangeInfo, ExchangeStatus, MarketCatalog, MarketInfo,
};
pub use symbol::{ExchangeId, Symbol, Timeframe};
