use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use marketsweep::ExchangeCollector;
use marketsweep_core::{ErrorKind, RetryConfig};
use marketsweep_mock::{MockExchange, MockStats};

use crate::helpers::ticker_only_config;

#[tokio::test(start_paused = true)]
async fn transient_failures_recover_within_the_attempt_budget() {
    let stats = MockStats::new();
    let mock = MockExchange::new("flaky", &["BTC/USDT"])
        .with_stats(Arc::clone(&stats))
        .ticker_fails_first(2);

    let data = ExchangeCollector::new(Box::new(mock), ticker_only_config(&["BTC/USDT"]))
        .collect()
        .await;

    assert_eq!(data.tickers.len(), 1);
    assert!(data.errors.is_empty());
    assert_eq!(stats.ticker_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_become_a_kind_tagged_error() {
    let stats = MockStats::new();
    let mock = MockExchange::new("broken", &["BTC/USDT"])
        .with_stats(Arc::clone(&stats))
        .ticker_fails_first(10);

    let data = ExchangeCollector::new(Box::new(mock), ticker_only_config(&["BTC/USDT"]))
        .collect()
        .await;

    assert!(data.tickers.is_empty());
    assert_eq!(data.errors.len(), 1);
    assert_eq!(data.errors[0].kind, ErrorKind::Ticker);
    assert_eq!(
        data.errors[0].symbol.as_ref().map(|s| s.as_str()),
        Some("BTC/USDT")
    );
    // Exactly max_attempts calls, then the failure is recorded.
    assert_eq!(stats.ticker_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn backoff_sleeps_between_attempts() {
    let mock = MockExchange::new("slowfail", &["BTC/USDT"]).ticker_fails_first(2);
    let mut config = ticker_only_config(&["BTC/USDT"]);
    config.retry = RetryConfig::default();

    let start = tokio::time::Instant::now();
    let data = ExchangeCollector::new(Box::new(mock), config).collect().await;

    assert_eq!(data.tickers.len(), 1);
    // Two failed attempts mean two default backoff sleeps of 4s each.
    assert!(start.elapsed() >= Duration::from_secs(8));
}
