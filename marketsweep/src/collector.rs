//! Per-exchange collection.

use futures::FutureExt;
use futures::stream::{self, StreamExt};
use marketsweep_core::{
    Candle, CollectedData, CollectionError, CollectorConfig, ErrorKind, ExchangeClient, OrderBook,
    SweepError, Symbol, Ticker, Timeframe, Trade,
};
use tracing::{debug, info, warn};

use crate::retry::RetryPolicy;

/// What one concurrent fetch produced.
enum FetchOutcome {
    Ticker(Ticker),
    OrderBook(OrderBook),
    Trades(Vec<Trade>),
    Candles(Vec<Candle>),
    Failed(CollectionError),
}

/// Collects every configured data kind from one exchange.
///
/// The collector exclusively owns its client and its result; `collect`
/// consumes the collector and hands the [`CollectedData`] back by value.
/// It never returns an error: every failure is recorded inside the result.
pub struct ExchangeCollector {
    client: Box<dyn ExchangeClient>,
    config: CollectorConfig,
    retry: RetryPolicy,
}

impl ExchangeCollector {
    /// Collector over an exclusively-owned client.
    #[must_use]
    pub fn new(client: Box<dyn ExchangeClient>, config: CollectorConfig) -> Self {
        let retry = RetryPolicy::new(config.retry);
        Self {
            client,
            config,
            retry,
        }
    }

    /// Replace the retry policy (classifier included).
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the full collection for this exchange.
    ///
    /// Initialization failure yields an error-only result; unresolvable
    /// symbols yield a warning-only result. The client is closed on every
    /// path.
    pub async fn collect(mut self) -> CollectedData {
        let exchange = self.client.exchange().clone();
        let mut data = CollectedData::new(exchange.clone());
        info!(exchange = %exchange, "starting collection");

        if let Err(err) = self.client.initialize().await {
            warn!(exchange = %exchange, error = %err, "initialization failed");
            data.errors.push(CollectionError::exchange_level(
                ErrorKind::Initialization,
                format!("initialization failed: {err}"),
            ));
            self.client.close().await;
            return data;
        }
        data.exchange_info = Some(self.client.info());

        if self.config.collect_status {
            if let Some(source) = self.client.as_status_source() {
                match source.status().await {
                    Ok(status) => data.exchange_status = Some(status),
                    Err(err) => {
                        warn!(exchange = %exchange, error = %err, "status unavailable");
                        data.warnings.push(format!("status unavailable: {err}"));
                    }
                }
            }
        }

        let (resolved, unresolved) = self.resolve_symbols();
        if !unresolved.is_empty() {
            let listing = unresolved
                .iter()
                .map(Symbol::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            warn!(exchange = %exchange, symbols = %listing, "symbols not listed, skipping");
            data.warnings.push(format!("symbols not listed: {listing}"));
        }
        if resolved.is_empty() {
            data.warnings
                .push("no requested symbols are listed on this exchange".to_string());
            self.client.close().await;
            return data;
        }

        let timeframes = self.enabled_timeframes();
        let depth = self.config.orderbook_depth_for(&exchange);
        let trades_limit = self.config.trades_limit_for(&exchange);
        let candles_limit = self.config.candles_limit_for(&exchange);
        let retry = self.retry;

        // Capabilities are queried once per run; a kind whose accessor is
        // `None` contributes no operations.
        {
            let client = &*self.client;
            let ticker_source = self
                .config
                .collect_ticker
                .then(|| client.as_ticker_source())
                .flatten();
            let order_book_source = self
                .config
                .collect_order_book
                .then(|| client.as_order_book_source())
                .flatten();
            let trades_source = self
                .config
                .collect_trades
                .then(|| client.as_trades_source())
                .flatten();
            let ohlcv_source = self
                .config
                .collect_ohlcv
                .then(|| client.as_ohlcv_source())
                .flatten();

            let mut ops = Vec::new();
            for symbol in &resolved {
                if let Some(source) = ticker_source {
                    let sym = symbol.clone();
                    ops.push(
                        async move {
                            let fetched = retry.run(|| source.ticker(&sym)).await;
                            match fetched {
                                Ok(ticker) => FetchOutcome::Ticker(ticker),
                                Err(err) => FetchOutcome::Failed(CollectionError::fetch(
                                    ErrorKind::Ticker,
                                    sym,
                                    None,
                                    err.to_string(),
                                )),
                            }
                        }
                        .boxed(),
                    );
                }

                if let Some(source) = order_book_source {
                    let sym = symbol.clone();
                    ops.push(
                        async move {
                            let fetched = retry.run(|| source.order_book(&sym, depth)).await;
                            match fetched {
                                Ok(book) => FetchOutcome::OrderBook(book),
                                Err(err) => FetchOutcome::Failed(CollectionError::fetch(
                                    ErrorKind::OrderBook,
                                    sym,
                                    None,
                                    err.to_string(),
                                )),
                            }
                        }
                        .boxed(),
                    );
                }

                if let Some(source) = trades_source {
                    let sym = symbol.clone();
                    ops.push(
                        async move {
                            let fetched = retry.run(|| source.trades(&sym, trades_limit)).await;
                            match fetched {
                                Ok(trades) => FetchOutcome::Trades(trades),
                                Err(err) => FetchOutcome::Failed(CollectionError::fetch(
                                    ErrorKind::Trades,
                                    sym,
                                    None,
                                    err.to_string(),
                                )),
                            }
                        }
                        .boxed(),
                    );
                }

                if let Some(source) = ohlcv_source {
                    for &timeframe in &timeframes {
                        let sym = symbol.clone();
                        ops.push(
                            async move {
                                let fetched = retry
                                    .run(|| source.candles(&sym, timeframe, candles_limit))
                                    .await;
                                match fetched {
                                    Ok(candles) => FetchOutcome::Candles(candles),
                                    Err(err) => FetchOutcome::Failed(CollectionError::fetch(
                                        ErrorKind::Ohlcv,
                                        sym,
                                        Some(timeframe),
                                        err.to_string(),
                                    )),
                                }
                            }
                            .boxed(),
                        );
                    }
                }
            }

            // The manager's semaphore bounds cross-exchange width; within one
            // exchange the fan-out runs as wide as configured.
            let width = self.config.max_parallel_ops.unwrap_or(ops.len()).max(1);
            debug!(exchange = %exchange, operations = ops.len(), width, "fetch fan-out built");
            let mut outcomes = stream::iter(ops).buffer_unordered(width);
            while let Some(outcome) = outcomes.next().await {
                match outcome {
                    FetchOutcome::Ticker(ticker) => data.tickers.push(ticker),
                    FetchOutcome::OrderBook(book) => data.order_books.push(book),
                    FetchOutcome::Trades(trades) => data.trades.extend(trades),
                    FetchOutcome::Candles(candles) => data.candles.extend(candles),
                    FetchOutcome::Failed(error) => data.errors.push(error),
                }
            }
        }

        self.client.close().await;
        info!(
            exchange = %exchange,
            records = data.record_count(),
            errors = data.errors.len(),
            "collection finished"
        );
        data
    }

    /// Map requested symbols to the exchange's native spellings.
    fn resolve_symbols(&self) -> (Vec<Symbol>, Vec<Symbol>) {
        let markets = self.client.markets();
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for symbol in &self.config.symbols {
            match markets.resolve(symbol) {
                Some(native) => {
                    if !resolved.contains(&native) {
                        resolved.push(native);
                    }
                }
                None => unresolved.push(symbol.clone()),
            }
        }
        (resolved, unresolved)
    }

    /// Configured timeframes the exchange can actually serve.
    fn enabled_timeframes(&self) -> Vec<Timeframe> {
        match self.client.as_ohlcv_source() {
            Some(source) => {
                let supported = source.supported_timeframes();
                self.config
                    .timeframes
                    .iter()
                    .copied()
                    .filter(|tf| supported.contains(tf))
                    .collect()
            }
            None => Vec::new(),
        }
    }
}

/// Default retryability: transient errors retry, caller mistakes fail fast.
#[must_use]
pub fn default_classifier(err: &SweepError) -> bool {
    err.is_transient()
}
