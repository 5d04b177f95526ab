//! Normalized records produced by fetch operations.
//!
//! Field sets mirror what public exchange endpoints commonly return; every
//! field an exchange may omit is `Option`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::symbol::{ExchangeId, Symbol, Timeframe};

/// Price/volume snapshot for one symbol on one exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Exchange the snapshot came from.
    pub exchange: ExchangeId,
    /// Symbol as resolved on this exchange.
    pub symbol: Symbol,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Last traded price.
    pub last: Option<f64>,
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// 24h high.
    pub high: Option<f64>,
    /// 24h low.
    pub low: Option<f64>,
    /// Price 24h ago.
    pub open: Option<f64>,
    /// Current price (usually equal to `last`).
    pub close: Option<f64>,

    /// 24h volume in the base currency.
    pub base_volume: Option<f64>,
    /// 24h volume in the quote currency.
    pub quote_volume: Option<f64>,

    /// 24h change in percent.
    pub percentage: Option<f64>,
    /// 24h change in quote units.
    pub change: Option<f64>,

    /// Volume-weighted average price.
    pub vwap: Option<f64>,
    /// Size available at the best bid.
    pub bid_volume: Option<f64>,
    /// Size available at the best ask.
    pub ask_volume: Option<f64>,
}

/// One price level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    /// Level price.
    pub price: f64,
    /// Quantity resting at this price.
    pub amount: f64,
}

/// Bid/ask depth snapshot with derived spread and depth figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Exchange the snapshot came from.
    pub exchange: ExchangeId,
    /// Symbol as resolved on this exchange.
    pub symbol: Symbol,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Buy side, best first.
    pub bids: Vec<BookLevel>,
    /// Sell side, best first.
    pub asks: Vec<BookLevel>,

    /// Best ask minus best bid, when both sides are populated.
    pub spread: Option<f64>,
    /// Spread as a percentage of the best ask.
    pub spread_percentage: Option<f64>,
    /// Total quantity across the captured bid levels.
    pub bid_depth: Option<f64>,
    /// Total quantity across the captured ask levels.
    pub ask_depth: Option<f64>,
}

impl OrderBook {
    /// Build a snapshot from raw levels, deriving spread and depth.
    #[must_use]
    pub fn from_levels(
        exchange: ExchangeId,
        symbol: Symbol,
        timestamp: DateTime<Utc>,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
    ) -> Self {
        let best_bid = bids.first().map(|l| l.price);
        let best_ask = asks.first().map(|l| l.price);
        let spread = match (best_bid, best_ask) {
            (Some(b), Some(a)) => Some(a - b),
            _ => None,
        };
        let spread_percentage = match (spread, best_ask) {
            (Some(s), Some(a)) if a != 0.0 => Some(s / a * 100.0),
            _ => None,
        };
        let depth = |side: &[BookLevel]| {
            if side.is_empty() {
                None
            } else {
                Some(side.iter().map(|l| l.amount).sum())
            }
        };
        let bid_depth = depth(&bids);
        let ask_depth = depth(&asks);
        Self {
            exchange,
            symbol,
            timestamp,
            bids,
            asks,
            spread,
            spread_percentage,
            bid_depth,
            ask_depth,
        }
    }
}

/// Whether a trade lifted the ask or hit the bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// Aggressor bought.
    Buy,
    /// Aggressor sold.
    Sell,
}

/// Which side of the book the reporting party was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityRole {
    /// Removed liquidity.
    Taker,
    /// Provided liquidity.
    Maker,
}

/// One executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Exchange the trade happened on.
    pub exchange: ExchangeId,
    /// Symbol as resolved on this exchange.
    pub symbol: Symbol,
    /// Execution time.
    pub timestamp: DateTime<Utc>,

    /// Exchange-assigned trade id, when published.
    pub trade_id: Option<String>,
    /// Execution price.
    pub price: f64,
    /// Executed quantity.
    pub amount: f64,
    /// Notional value (`price * amount`), when published.
    pub cost: Option<f64>,
    /// Aggressor side, when published.
    pub side: Option<TradeSide>,
    /// Maker/taker role, when published.
    pub taker_or_maker: Option<LiquidityRole>,
}

/// One candlestick of an OHLCV series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Exchange the series came from.
    pub exchange: ExchangeId,
    /// Symbol as resolved on this exchange.
    pub symbol: Symbol,
    /// Candle timeframe.
    pub timeframe: Timeframe,

    /// Period start.
    pub timestamp: DateTime<Utc>,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Traded volume over the period.
    pub volume: f64,
}
