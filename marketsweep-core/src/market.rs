//! Market catalogs, exchange metadata, and symbol resolution.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::DataKind;
use crate::symbol::{ExchangeId, Symbol, Timeframe};

/// Operational state an exchange reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExchangeHealth {
    /// Fully operational.
    Ok,
    /// Planned maintenance window.
    Maintenance,
    /// Degraded or erroring.
    Error,
    /// The exchange did not say.
    Unknown,
}

/// Exchange status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeStatus {
    /// Exchange the status belongs to.
    pub exchange: ExchangeId,
    /// When the status was checked.
    pub timestamp: DateTime<Utc>,
    /// Reported operational state.
    pub status: ExchangeHealth,
    /// When the exchange last updated its status page.
    pub updated: Option<DateTime<Utc>>,
    /// Estimated end of a maintenance window.
    pub eta: Option<DateTime<Utc>>,
    /// Status page URL.
    pub url: Option<String>,
}

/// Boolean capability map declared by an exchange client.
///
/// Mirrors the feature flags public exchange libraries publish; the collector
/// consults this (via the client's source accessors) before building any
/// fetch operation, so an unsupported kind is skipped rather than attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Single-symbol ticker snapshots.
    pub ticker: bool,
    /// Bulk all-symbols ticker endpoint.
    pub bulk_tickers: bool,
    /// Order-book depth snapshots.
    pub order_book: bool,
    /// Recent-trades listing.
    pub trades: bool,
    /// Candlestick series.
    pub ohlcv: bool,
}

impl CapabilitySet {
    /// Whether the given kind is declared supported.
    #[must_use]
    pub const fn supports(&self, kind: DataKind) -> bool {
        match kind {
            DataKind::Ticker => self.ticker,
            DataKind::OrderBook => self.order_book,
            DataKind::Trades => self.trades,
            DataKind::Ohlcv => self.ohlcv,
        }
    }
}

/// Static metadata about one exchange, captured at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeInfo {
    /// Exchange identifier.
    pub name: ExchangeId,
    /// Countries the exchange operates from.
    pub countries: Vec<String>,
    /// Declared feature support.
    pub capabilities: CapabilitySet,
    /// Candle timeframes the exchange serves.
    pub timeframes: Vec<Timeframe>,
    /// Client-side rate limit hint, in milliseconds between requests.
    pub rate_limit_ms: Option<u32>,
}

/// Listing metadata for one market (trading pair) on one exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Symbol in the exchange's native spelling.
    pub symbol: Symbol,
    /// Base currency (e.g. BTC).
    pub base: String,
    /// Quote currency (e.g. USDT).
    pub quote: String,
    /// Whether the market is currently tradeable.
    pub active: bool,

    /// Minimum order size, when published.
    pub min_amount: Option<f64>,
    /// Maximum order size, when published.
    pub max_amount: Option<f64>,
    /// Taker fee, when published.
    pub taker_fee: Option<f64>,
    /// Maker fee, when published.
    pub maker_fee: Option<f64>,
}

impl MarketInfo {
    /// Minimal listing for a pair symbol, splitting base/quote on `/`.
    #[must_use]
    pub fn listed(symbol: Symbol) -> Self {
        let (base, quote) = symbol
            .as_str()
            .split_once('/')
            .map_or_else(|| (symbol.as_str(), ""), |(b, q)| (b, q));
        Self {
            base: base.to_string(),
            quote: quote.to_string(),
            symbol,
            active: true,
            min_amount: None,
            max_amount: None,
            taker_fee: None,
            maker_fee: None,
        }
    }
}

/// The set of markets an exchange listed at initialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketCatalog {
    markets: HashMap<Symbol, MarketInfo>,
}

impl MarketCatalog {
    /// Build a catalog from listing metadata.
    #[must_use]
    pub fn new(markets: impl IntoIterator<Item = MarketInfo>) -> Self {
        Self {
            markets: markets
                .into_iter()
                .map(|m| (m.symbol.clone(), m))
                .collect(),
        }
    }

    /// Number of listed markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Whether no markets are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Whether the exact symbol is listed.
    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.markets.contains_key(symbol)
    }

    /// Listing metadata for an exact symbol.
    #[must_use]
    pub fn get(&self, symbol: &Symbol) -> Option<&MarketInfo> {
        self.markets.get(symbol)
    }

    /// Resolve a requested symbol to this exchange's native spelling.
    ///
    /// Tries the symbol as given, then each alias format in order
    /// (separator stripped, dash, underscore). Returns `None` when nothing
    /// matches; the caller drops the symbol with a warning, not an error.
    #[must_use]
    pub fn resolve(&self, symbol: &Symbol) -> Option<Symbol> {
        if self.contains(symbol) {
            return Some(symbol.clone());
        }
        symbol
            .alias_candidates()
            .into_iter()
            .find(|alt| self.contains(alt))
    }

    /// Iterate over listed markets in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &MarketInfo> {
        self.markets.values()
    }
}
