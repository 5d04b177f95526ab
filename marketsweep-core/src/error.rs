use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the marketsweep workspace.
///
/// This wraps capability mismatches, exchange-tagged failures, not-found
/// conditions, transport problems, and the fatal configuration case. Only
/// `Configuration` is allowed to escape the engine's public API; everything
/// else is captured into a [`crate::CollectionError`] record before a run
/// returns.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SweepError {
    /// The requested capability is not implemented by the target exchange.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "order-book").
        capability: String,
    },

    /// The exchange rejected or failed the call.
    #[error("{exchange} failed: {msg}")]
    Exchange {
        /// Exchange identifier that failed.
        exchange: String,
        /// Human-readable error message.
        msg: String,
    },

    /// Transport-level failure (connect, DNS, TLS, read).
    #[error("network error: {0}")]
    Network(String),

    /// A symbol or resource could not be found on the exchange.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "market BTC/USDT".
        what: String,
    },

    /// An individual call exceeded its timeout budget.
    #[error("timed out: {what}")]
    Timeout {
        /// Label for the operation that timed out.
        what: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Fatal pre-run configuration problem; the only variant that raises out
    /// of the public collection API, and only before any task is spawned.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl SweepError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build an `Exchange` error with the exchange id and message.
    pub fn exchange(exchange: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Exchange {
            exchange: exchange.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of what is missing.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `Timeout` error.
    #[must_use]
    pub fn timeout(what: impl Into<String>) -> Self {
        Self::Timeout { what: what.into() }
    }

    /// Helper: build a `Configuration` error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error is plausibly transient and worth retrying.
    ///
    /// Capability absence, missing symbols, and argument/configuration
    /// problems will not heal on a re-attempt; network hiccups, exchange
    /// errors, and timeouts might. The retry layer uses retry-everything by
    /// default, so this is an opt-in classifier for stricter policies.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Unsupported { .. }
            | Self::NotFound { .. }
            | Self::InvalidArg(_)
            | Self::Configuration(_) => false,
            Self::Exchange { .. } | Self::Network(_) | Self::Timeout { .. } | Self::Other(_) => {
                true
            }
        }
    }
}
