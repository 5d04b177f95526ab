#![allow(dead_code)]

use std::time::Duration;

use marketsweep_core::{CollectorConfig, RetryConfig, Symbol};

/// Collector settings limited to ticker collection for one symbol set.
pub fn ticker_only_config(symbols: &[&str]) -> CollectorConfig {
    CollectorConfig {
        symbols: symbols.iter().map(|s| Symbol::new(*s)).collect(),
        collect_order_book: false,
        collect_trades: false,
        collect_ohlcv: false,
        collect_status: false,
        retry: quick_retry(),
        ..CollectorConfig::default()
    }
}

/// Collector settings with every kind enabled for one symbol set.
pub fn full_config(symbols: &[&str]) -> CollectorConfig {
    CollectorConfig {
        symbols: symbols.iter().map(|s| Symbol::new(*s)).collect(),
        retry: quick_retry(),
        ..CollectorConfig::default()
    }
}

/// Install a compact subscriber honoring `RUST_LOG`; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .try_init();
}

/// Short backoffs so retry tests finish quickly.
pub fn quick_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        multiplier: Duration::from_millis(10),
        min_backoff: Duration::from_millis(10),
        max_backoff: Duration::from_millis(40),
    }
}
