use core::fmt;
use serde::{Deserialize, Serialize};

/// Public market-data kinds the collection engine knows how to fetch.
///
/// These map one-to-one with the source role traits on
/// [`crate::client::ExchangeClient`] and allow consistent Display formatting
/// in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataKind {
    /// Point-in-time price/volume snapshot.
    Ticker,
    /// Bid/ask depth snapshot.
    OrderBook,
    /// Recent executed trades.
    Trades,
    /// Candlestick series for a timeframe.
    Ohlcv,
}

impl DataKind {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::OrderBook => "order-book",
            Self::Trades => "trades",
            Self::Ohlcv => "ohlcv",
        }
    }

    /// All kinds, in the order the collector attempts them.
    pub const ALL: [Self; 4] = [Self::Ticker, Self::OrderBook, Self::Trades, Self::Ohlcv];
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
