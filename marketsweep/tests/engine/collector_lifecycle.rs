use marketsweep::ExchangeCollector;
use marketsweep_core::{ErrorKind, SweepError};
use marketsweep_mock::{MockExchange, MockStats};

use crate::helpers::{full_config, ticker_only_config};

#[tokio::test]
async fn successful_run_collects_every_kind_and_closes() {
    let stats = MockStats::new();
    let mock = MockExchange::new("binance", &["BTC/USDT", "ETH/USDT"])
        .with_stats(std::sync::Arc::clone(&stats));

    let data = ExchangeCollector::new(Box::new(mock), full_config(&["BTC/USDT", "ETH/USDT"]))
        .collect()
        .await;

    assert_eq!(data.exchange.as_str(), "binance");
    assert_eq!(data.tickers.len(), 2);
    assert_eq!(data.order_books.len(), 2);
    assert!(!data.trades.is_empty());
    assert!(!data.candles.is_empty());
    assert!(data.exchange_info.is_some());
    assert!(data.exchange_status.is_some());
    assert!(data.errors.is_empty());
    assert_eq!(
        stats
            .close_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn bounded_fan_out_collects_the_same_data() {
    let mock = MockExchange::new("narrow", &["BTC/USDT", "ETH/USDT"]);
    let mut config = full_config(&["BTC/USDT", "ETH/USDT"]);
    config.max_parallel_ops = Some(1);

    let data = ExchangeCollector::new(Box::new(mock), config).collect().await;

    assert_eq!(data.tickers.len(), 2);
    assert_eq!(data.order_books.len(), 2);
    assert!(data.errors.is_empty());
}

#[tokio::test]
async fn initialization_failure_yields_error_only_result() {
    let stats = MockStats::new();
    let mock = MockExchange::new("downex", &["BTC/USDT"])
        .with_stats(std::sync::Arc::clone(&stats))
        .failing_init(SweepError::Network("connection refused".into()));

    let data = ExchangeCollector::new(Box::new(mock), ticker_only_config(&["BTC/USDT"]))
        .collect()
        .await;

    assert_eq!(data.record_count(), 0);
    assert_eq!(data.errors.len(), 1);
    assert_eq!(data.errors[0].kind, ErrorKind::Initialization);
    assert!(data.errors[0].message.contains("connection refused"));
    // The connection is released even though initialization failed.
    assert_eq!(
        stats
            .close_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
    assert_eq!(
        stats
            .ticker_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );
}

#[tokio::test]
async fn status_failure_is_a_warning_not_an_error() {
    let mut mock = MockExchange::new("flaky-status", &["BTC/USDT"]);
    mock.status_error = Some(SweepError::timeout("status page"));
    let mut config = ticker_only_config(&["BTC/USDT"]);
    config.collect_status = true;

    let data = ExchangeCollector::new(Box::new(mock), config).collect().await;

    assert!(data.exchange_status.is_none());
    assert!(data.errors.is_empty());
    assert_eq!(data.warnings.len(), 1);
    assert!(data.warnings[0].contains("status unavailable"));
    assert_eq!(data.tickers.len(), 1);
}
