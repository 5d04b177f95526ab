use std::sync::Arc;

use marketsweep::CollectionManager;
use marketsweep_core::{ExchangeId, SweepError};
use marketsweep_mock::{MockCatalog, MockExchange};

use crate::helpers::ticker_only_config;

fn mixed_catalog() -> Arc<MockCatalog> {
    Arc::new(
        MockCatalog::new()
            .register("healthy", || {
                Box::new(MockExchange::new("healthy", &["BTC/USDT", "ETH/USDT"]))
            })
            .register("broken", || {
                Box::new(
                    MockExchange::new("broken", &["BTC/USDT"])
                        .failing_init(SweepError::Network("down".into())),
                )
            }),
    )
}

#[tokio::test]
async fn no_run_means_no_summary() {
    let manager = CollectionManager::builder(mixed_catalog()).build().unwrap();
    assert!(manager.summary().is_none());
    assert!(manager.errors_summary().is_empty());
    assert!(manager.last_run().is_none());
}

#[tokio::test]
async fn summary_totals_match_the_stored_run() {
    let mut manager = CollectionManager::builder(mixed_catalog())
        .collector_config(ticker_only_config(&["BTC/USDT", "ETH/USDT"]))
        .build()
        .unwrap();

    let run = manager.collect_all(None).await.unwrap();
    let summary = manager.summary().unwrap();

    assert_eq!(summary.exchanges_collected, 2);
    assert_eq!(
        summary.total_tickers,
        run.exchanges.values().map(|d| d.tickers.len()).sum::<usize>()
    );
    assert_eq!(summary.total_tickers, 2);
    assert_eq!(summary.total_order_books, 0);
    assert_eq!(summary.total_errors, 1);
}

#[tokio::test]
async fn errors_summary_only_lists_failing_exchanges() {
    let mut manager = CollectionManager::builder(mixed_catalog())
        .collector_config(ticker_only_config(&["BTC/USDT"]))
        .build()
        .unwrap();

    manager.collect_all(None).await.unwrap();
    let errors = manager.errors_summary();

    assert_eq!(errors.len(), 1);
    let broken = errors.get(&ExchangeId::new("broken")).unwrap();
    assert_eq!(broken.len(), 1);
    assert!(!errors.contains_key(&ExchangeId::new("healthy")));
}
