use std::sync::Arc;

use marketsweep::CollectionManager;
use marketsweep_core::{ExchangeId, ManagerConfig, SweepError};
use marketsweep_mock::{MockCatalog, MockExchange};

use crate::helpers::ticker_only_config;

fn catalog_abc() -> Arc<MockCatalog> {
    Arc::new(
        MockCatalog::new()
            .register("a", || Box::new(MockExchange::new("a", &["BTC/USDT"])))
            .register("b", || Box::new(MockExchange::new("b", &["BTC/USDT"])))
            .register("c", || Box::new(MockExchange::new("c", &["BTC/USDT"]))),
    )
}

#[tokio::test]
async fn priority_run_intersects_with_the_catalog_and_truncates() {
    let mut manager = CollectionManager::builder(catalog_abc())
        .manager_config(ManagerConfig {
            priority_exchanges: vec![
                ExchangeId::new("c"),
                ExchangeId::new("offline"),
                ExchangeId::new("a"),
                ExchangeId::new("b"),
            ],
            ..Default::default()
        })
        .collector_config(ticker_only_config(&["BTC/USDT"]))
        .build()
        .unwrap();

    // "offline" is not in the catalog, so the first two known priority
    // exchanges are "c" and "a".
    let run = manager.collect_from_priority_exchanges(2).await.unwrap();
    assert_eq!(run.len(), 2);
    assert!(run.get(&ExchangeId::new("c")).is_some());
    assert!(run.get(&ExchangeId::new("a")).is_some());
    assert!(run.get(&ExchangeId::new("b")).is_none());
}

#[tokio::test]
async fn empty_priority_intersection_is_a_configuration_error() {
    let mut manager = CollectionManager::builder(catalog_abc())
        .manager_config(ManagerConfig {
            priority_exchanges: vec![ExchangeId::new("offline")],
            ..Default::default()
        })
        .build()
        .unwrap();

    let err = manager.collect_from_priority_exchanges(5).await.unwrap_err();
    assert!(matches!(err, SweepError::Configuration(_)));
}

#[tokio::test]
async fn full_catalog_run_collects_everything_regardless_of_priority() {
    let mut manager = CollectionManager::builder(catalog_abc())
        .manager_config(ManagerConfig {
            priority_exchanges: vec![ExchangeId::new("b")],
            ..Default::default()
        })
        .collector_config(ticker_only_config(&["BTC/USDT"]))
        .build()
        .unwrap();

    // Priority is an ordering hint for catalog-resolved runs, not a filter.
    let run = manager.collect_all(None).await.unwrap();
    assert_eq!(run.len(), 3);
}
