//! Cross-exchange scheduling.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use marketsweep_core::{
    CatalogProvider, CollectedData, CollectionError, CollectionRun, CollectorConfig, ErrorKind,
    ExchangeId, ManagerConfig, SweepError, prioritize,
};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::collector::ExchangeCollector;
use crate::retry::RetryPolicy;
use crate::summary::{RunSummary, errors_by_exchange};

/// Builder for [`CollectionManager`].
///
/// Configuration that can be wrong is rejected here, before any task spawns.
pub struct CollectionManagerBuilder {
    catalog: Arc<dyn CatalogProvider>,
    manager: ManagerConfig,
    collector: CollectorConfig,
    retry: Option<RetryPolicy>,
}

impl CollectionManagerBuilder {
    /// Builder over the catalog the manager will draw clients from.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            catalog,
            manager: ManagerConfig::default(),
            collector: CollectorConfig::default(),
            retry: None,
        }
    }

    /// Cross-exchange scheduling settings.
    #[must_use]
    pub fn manager_config(mut self, config: ManagerConfig) -> Self {
        self.manager = config;
        self
    }

    /// Per-exchange collection settings.
    #[must_use]
    pub fn collector_config(mut self, config: CollectorConfig) -> Self {
        self.collector = config;
        self
    }

    /// Override the retry policy every collector uses.
    #[must_use]
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Validate the configuration and build the manager.
    ///
    /// # Errors
    /// `SweepError::Configuration` when `max_concurrent` is zero.
    pub fn build(self) -> Result<CollectionManager, SweepError> {
        if self.manager.max_concurrent == 0 {
            return Err(SweepError::configuration(
                "max_concurrent must be at least 1",
            ));
        }
        Ok(CollectionManager {
            catalog: self.catalog,
            manager: self.manager,
            collector: self.collector,
            retry: self.retry,
            last_run: None,
        })
    }
}

/// Schedules collectors across exchanges under a concurrency bound.
///
/// A run always completes with one [`CollectedData`] per requested
/// (deduplicated) exchange; individual exchange failures never surface as
/// errors from [`collect_all`](Self::collect_all). The only fatal path is a
/// configuration problem detected before any work starts.
pub struct CollectionManager {
    catalog: Arc<dyn CatalogProvider>,
    manager: ManagerConfig,
    collector: CollectorConfig,
    retry: Option<RetryPolicy>,
    last_run: Option<CollectionRun>,
}

impl CollectionManager {
    /// Builder entry point.
    #[must_use]
    pub fn builder(catalog: Arc<dyn CatalogProvider>) -> CollectionManagerBuilder {
        CollectionManagerBuilder::new(catalog)
    }

    /// Collect from the given exchanges, or the whole catalog when `None`.
    ///
    /// A catalog-resolved list is reordered so configured priority exchanges
    /// are attempted first (ordering hint only). Duplicates are dropped while
    /// preserving first occurrence.
    ///
    /// # Errors
    /// `SweepError::Configuration` when the resolved exchange list is empty;
    /// no task is spawned in that case.
    pub async fn collect_all(
        &mut self,
        exchanges: Option<Vec<ExchangeId>>,
    ) -> Result<CollectionRun, SweepError> {
        let started_at = Utc::now();
        let list = match exchanges {
            Some(list) => list,
            None => prioritize(self.catalog.exchanges(), &self.manager),
        };
        let mut seen = HashSet::new();
        let requested: Vec<ExchangeId> = list
            .into_iter()
            .filter(|exchange| seen.insert(exchange.clone()))
            .collect();
        if requested.is_empty() {
            return Err(SweepError::configuration("no exchanges to collect from"));
        }

        info!(
            exchanges = requested.len(),
            max_concurrent = self.manager.max_concurrent,
            "starting collection run"
        );

        let semaphore = Arc::new(Semaphore::new(self.manager.max_concurrent));
        let mut tasks = Vec::with_capacity(requested.len());
        for exchange in requested {
            let semaphore = Arc::clone(&semaphore);
            let catalog = Arc::clone(&self.catalog);
            let config = self.collector.clone();
            let retry = self.retry;
            let task_exchange = exchange.clone();
            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return failed_entry(&task_exchange, "scheduler semaphore closed");
                    }
                };
                match catalog.connect(&task_exchange) {
                    Some(client) => {
                        let mut collector = ExchangeCollector::new(client, config);
                        if let Some(retry) = retry {
                            collector = collector.with_retry(retry);
                        }
                        collector.collect().await
                    }
                    None => failed_entry(&task_exchange, "exchange not available in catalog"),
                }
            });
            tasks.push((exchange, handle));
        }

        let mut results: HashMap<ExchangeId, CollectedData> = HashMap::with_capacity(tasks.len());
        for (exchange, handle) in tasks {
            let data = match handle.await {
                Ok(data) => data,
                Err(join_err) => {
                    warn!(exchange = %exchange, error = %join_err, "collection task failed");
                    failed_entry(&exchange, format!("collection task failed: {join_err}"))
                }
            };
            results.insert(exchange, data);
        }

        let run = CollectionRun {
            exchanges: results,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            exchanges = run.exchanges.len(),
            "collection run finished"
        );
        self.last_run = Some(run.clone());
        Ok(run)
    }

    /// Collect from at most `limit` configured priority exchanges that the
    /// catalog actually knows.
    ///
    /// # Errors
    /// `SweepError::Configuration` when the intersection is empty.
    pub async fn collect_from_priority_exchanges(
        &mut self,
        limit: usize,
    ) -> Result<CollectionRun, SweepError> {
        let available = self.catalog.exchanges();
        let mut list: Vec<ExchangeId> = self
            .manager
            .priority_exchanges
            .iter()
            .filter(|exchange| available.contains(exchange))
            .cloned()
            .collect();
        list.truncate(limit);
        self.collect_all(Some(list)).await
    }

    /// The most recent finished run, if any.
    #[must_use]
    pub fn last_run(&self) -> Option<&CollectionRun> {
        self.last_run.as_ref()
    }

    /// Totals over the last run.
    #[must_use]
    pub fn summary(&self) -> Option<RunSummary> {
        self.last_run.as_ref().map(RunSummary::of)
    }

    /// Exchange → error list for the last run, restricted to exchanges with
    /// at least one error. Empty when no run has finished.
    #[must_use]
    pub fn errors_summary(&self) -> HashMap<ExchangeId, Vec<CollectionError>> {
        self.last_run
            .as_ref()
            .map(errors_by_exchange)
            .unwrap_or_default()
    }
}

/// Error-only result for an exchange the engine could not collect at all.
fn failed_entry(exchange: &ExchangeId, message: impl Into<String>) -> CollectedData {
    let mut data = CollectedData::new(exchange.clone());
    data.errors.push(CollectionError::exchange_level(
        ErrorKind::CollectionFailed,
        message,
    ));
    data
}
