use std::collections::HashSet;
use std::sync::Arc;

use marketsweep::CollectionManager;
use marketsweep_core::{ErrorKind, ExchangeId, SweepError};
use marketsweep_mock::{MockCatalog, MockExchange};
use proptest::prelude::*;

use crate::helpers::ticker_only_config;

fn two_exchange_catalog() -> Arc<MockCatalog> {
    Arc::new(
        MockCatalog::new()
            .register("alpha", || Box::new(MockExchange::new("alpha", &["BTC/USDT"])))
            .register("beta", || Box::new(MockExchange::new("beta", &["BTC/USDT"]))),
    )
}

#[tokio::test]
async fn every_requested_exchange_appears_exactly_once() {
    let mut manager = CollectionManager::builder(two_exchange_catalog())
        .collector_config(ticker_only_config(&["BTC/USDT"]))
        .build()
        .unwrap();

    let requested = vec![
        ExchangeId::new("alpha"),
        ExchangeId::new("beta"),
        ExchangeId::new("alpha"),
        ExchangeId::new("ghost"),
    ];
    let run = manager.collect_all(Some(requested)).await.unwrap();

    assert_eq!(run.len(), 3);
    assert!(run.get(&ExchangeId::new("alpha")).is_some());
    assert!(run.get(&ExchangeId::new("beta")).is_some());

    // The unknown exchange still gets an entry, error-only.
    let ghost = run.get(&ExchangeId::new("ghost")).unwrap();
    assert_eq!(ghost.errors.len(), 1);
    assert_eq!(ghost.errors[0].kind, ErrorKind::CollectionFailed);
}

#[tokio::test]
async fn empty_exchange_list_is_a_configuration_error() {
    let mut manager = CollectionManager::builder(two_exchange_catalog())
        .build()
        .unwrap();

    let err = manager.collect_all(Some(Vec::new())).await.unwrap_err();
    assert!(matches!(err, SweepError::Configuration(_)));
}

#[tokio::test]
async fn empty_catalog_is_a_configuration_error() {
    let mut manager = CollectionManager::builder(Arc::new(MockCatalog::new()))
        .build()
        .unwrap();

    let err = manager.collect_all(None).await.unwrap_err();
    assert!(matches!(err, SweepError::Configuration(_)));
}

#[test]
fn zero_concurrency_is_rejected_at_build_time() {
    let result = CollectionManager::builder(two_exchange_catalog())
        .manager_config(marketsweep_core::ManagerConfig {
            max_concurrent: 0,
            ..Default::default()
        })
        .build();
    assert!(matches!(result, Err(SweepError::Configuration(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn run_keys_equal_deduplicated_request(
        ids in proptest::collection::vec("[a-e]|ghost[0-3]", 1..12)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        runtime.block_on(async {
            let catalog = Arc::new(
                MockCatalog::new()
                    .register("a", || Box::new(MockExchange::new("a", &["BTC/USDT"])))
                    .register("b", || Box::new(MockExchange::new("b", &["BTC/USDT"])))
                    .register("c", || Box::new(MockExchange::new("c", &["BTC/USDT"]))),
            );
            let mut manager = CollectionManager::builder(catalog)
                .collector_config(crate::helpers::ticker_only_config(&["BTC/USDT"]))
                .build()
                .unwrap();

            let requested: Vec<ExchangeId> =
                ids.iter().map(|id| ExchangeId::new(id.clone())).collect();
            let unique: HashSet<&ExchangeId> = requested.iter().collect();

            let run = manager.collect_all(Some(requested.clone())).await.unwrap();
            assert_eq!(run.len(), unique.len());
            for id in unique {
                assert!(run.get(id).is_some());
            }
        });
    }
}
