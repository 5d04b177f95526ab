use std::sync::Arc;
use std::sync::atomic::Ordering;

use marketsweep::ExchangeCollector;
use marketsweep_mock::{MockExchange, MockStats};

use crate::helpers::{full_config, ticker_only_config};

#[tokio::test]
async fn alias_fallback_yields_one_operation_per_kind() {
    let stats = MockStats::new();
    // The exchange lists the pair without a separator.
    let mock = MockExchange::new("nosep", &["BTCUSDT"]).with_stats(Arc::clone(&stats));

    let mut config = full_config(&["BTC/USDT"]);
    config.collect_ohlcv = false;
    config.collect_status = false;

    let data = ExchangeCollector::new(Box::new(mock), config).collect().await;

    // One ticker, one order book, one trades fetch for the resolved alias;
    // never one per alias candidate.
    assert_eq!(stats.ticker_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stats.order_book_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stats.trades_calls.load(Ordering::SeqCst), 1);
    assert_eq!(data.tickers[0].symbol.as_str(), "BTCUSDT");
    assert!(data.errors.is_empty());
}

#[tokio::test]
async fn unlisted_symbols_are_dropped_with_a_warning() {
    let mock = MockExchange::new("small", &["BTC/USDT"]);

    let data = ExchangeCollector::new(
        Box::new(mock),
        ticker_only_config(&["BTC/USDT", "DOGE/XYZ"]),
    )
    .collect()
    .await;

    assert_eq!(data.tickers.len(), 1);
    assert!(data.errors.is_empty());
    assert!(
        data.warnings
            .iter()
            .any(|w| w.contains("DOGE/XYZ")),
        "warnings: {:?}",
        data.warnings
    );
}

#[tokio::test]
async fn nothing_resolvable_returns_a_warning_only_result() {
    let stats = MockStats::new();
    let mock = MockExchange::new("other-quote", &["BTC/EUR"]).with_stats(Arc::clone(&stats));

    let data = ExchangeCollector::new(Box::new(mock), ticker_only_config(&["DOGE/USDT"]))
        .collect()
        .await;

    assert_eq!(data.record_count(), 0);
    assert!(data.errors.is_empty());
    assert!(!data.warnings.is_empty());
    assert_eq!(stats.ticker_calls.load(Ordering::SeqCst), 0);
    // The connection is still released.
    assert_eq!(stats.close_calls.load(Ordering::SeqCst), 1);
}
