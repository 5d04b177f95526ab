//! Read-only aggregation over a finished run.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use marketsweep_core::{CollectionError, CollectionRun, ExchangeId};
use serde::{Deserialize, Serialize};

/// Record and error totals for one collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Exchanges that appear in the run.
    pub exchanges_collected: usize,
    /// Ticker snapshots across all exchanges.
    pub total_tickers: usize,
    /// Order-book snapshots across all exchanges.
    pub total_order_books: usize,
    /// Trades across all exchanges.
    pub total_trades: usize,
    /// Candles across all exchanges.
    pub total_candles: usize,
    /// Errors across all exchanges.
    pub total_errors: usize,
    /// When this summary was computed.
    pub generated_at: DateTime<Utc>,
}

impl RunSummary {
    /// Totals for the given run.
    #[must_use]
    pub fn of(run: &CollectionRun) -> Self {
        let mut summary = Self {
            exchanges_collected: run.exchanges.len(),
            total_tickers: 0,
            total_order_books: 0,
            total_trades: 0,
            total_candles: 0,
            total_errors: 0,
            generated_at: Utc::now(),
        };
        for data in run.exchanges.values() {
            summary.total_tickers += data.tickers.len();
            summary.total_order_books += data.order_books.len();
            summary.total_trades += data.trades.len();
            summary.total_candles += data.candles.len();
            summary.total_errors += data.errors.len();
        }
        summary
    }
}

/// Exchange → error list, restricted to exchanges with at least one error.
#[must_use]
pub fn errors_by_exchange(run: &CollectionRun) -> HashMap<ExchangeId, Vec<CollectionError>> {
    run.exchanges
        .iter()
        .filter(|(_, data)| data.has_errors())
        .map(|(exchange, data)| (exchange.clone(), data.errors.clone()))
        .collect()
}
