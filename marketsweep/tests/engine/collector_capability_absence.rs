use std::sync::Arc;
use std::sync::atomic::Ordering;

use marketsweep::ExchangeCollector;
use marketsweep_mock::{MockExchange, MockStats};

use crate::helpers::full_config;

#[tokio::test]
async fn missing_capability_is_skipped_without_error() {
    let stats = MockStats::new();
    let mut mock = MockExchange::new("spotonly", &["BTC/USDT"]).with_stats(Arc::clone(&stats));
    mock.has_trades = false;
    mock.has_ohlcv = false;

    let data = ExchangeCollector::new(Box::new(mock), full_config(&["BTC/USDT"]))
        .collect()
        .await;

    assert_eq!(data.tickers.len(), 1);
    assert_eq!(data.order_books.len(), 1);
    assert!(data.trades.is_empty());
    assert!(data.candles.is_empty());
    // Nothing was attempted for the unsupported kinds, and nothing failed.
    assert_eq!(stats.trades_calls.load(Ordering::SeqCst), 0);
    assert_eq!(stats.candles_calls.load(Ordering::SeqCst), 0);
    assert!(data.errors.is_empty());
}

#[tokio::test]
async fn ohlcv_requests_only_supported_timeframes() {
    use marketsweep_core::Timeframe;

    let stats = MockStats::new();
    let mut mock = MockExchange::new("limited", &["BTC/USDT"]).with_stats(Arc::clone(&stats));
    mock.timeframes = vec![Timeframe::H1, Timeframe::D1];

    let mut config = full_config(&["BTC/USDT"]);
    config.collect_ticker = false;
    config.collect_order_book = false;
    config.collect_trades = false;
    config.collect_status = false;
    config.timeframes = vec![Timeframe::M1, Timeframe::H1, Timeframe::D1, Timeframe::W1];

    let data = ExchangeCollector::new(Box::new(mock), config).collect().await;

    // Only the intersection {H1, D1} was fetched.
    assert_eq!(stats.candles_calls.load(Ordering::SeqCst), 2);
    assert!(data.errors.is_empty());
    let seen: std::collections::HashSet<_> = data.candles.iter().map(|c| c.timeframe).collect();
    assert_eq!(
        seen,
        [Timeframe::H1, Timeframe::D1].into_iter().collect()
    );
}
