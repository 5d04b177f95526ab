//! Marketsweep collects market data across many crypto exchanges at once.
//!
//! Overview
//! - One [`ExchangeCollector`] per exchange owns the connection lifecycle:
//!   initialize, resolve symbols against the listed markets, fan out one
//!   fetch per (symbol, data kind, timeframe), close.
//! - The [`CollectionManager`] bounds how many exchanges collect at once
//!   with a counting semaphore and guarantees one result entry per requested
//!   exchange, error-only entries included.
//! - Every fetch runs behind a [`RetryPolicy`] with clamped exponential
//!   backoff; exhausted failures are recorded on the owning result, never
//!   raised across the collector boundary.
//!
//! Key behaviors and trade-offs
//! - Failures are isolated per exchange: a run always completes and callers
//!   inspect each entry's `errors`/`warnings` instead of catching anything.
//!   The single fatal path is a configuration problem (empty exchange list,
//!   zero concurrency), rejected before any task spawns.
//! - Within one exchange the fan-out is unbounded unless
//!   `CollectorConfig::max_parallel_ops` caps it, so per-exchange load
//!   defaults to the symbol and data-kind product.
//! - Capability discovery is per-client: a kind whose source accessor
//!   returns `None` is skipped silently, not recorded as a failure.
//!
//! Examples
//! Collecting from a catalog with a concurrency bound:
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketsweep::CollectionManager;
//! use marketsweep_core::{CollectorConfig, ManagerConfig};
//!
//! let mut manager = CollectionManager::builder(catalog)
//!     .manager_config(ManagerConfig { max_concurrent: 5, ..Default::default() })
//!     .collector_config(CollectorConfig::default())
//!     .build()?;
//!
//! let run = manager.collect_all(None).await?;
//! for (exchange, data) in &run.exchanges {
//!     println!("{exchange}: {} records, {} errors", data.record_count(), data.errors.len());
//! }
//! ```
#![warn(missing_docs)]

mod collector;
mod manager;
mod retry;
mod summary;

pub use collector::{ExchangeCollector, default_classifier};
pub use manager::{CollectionManager, CollectionManagerBuilder};
pub use retry::RetryPolicy;
pub use summary::{RunSummary, errors_by_exchange};

pub use marketsweep_core::{
    CatalogProvider, CollectedData, CollectionError, CollectionRun, CollectorConfig, ErrorKind,
    ExchangeClient, ExchangeId, ManagerConfig, RetryConfig, SweepError, Symbol, Timeframe,
};
