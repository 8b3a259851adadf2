//! Typed errors shared across the workspace

use thiserror::Error;

/// Errors raised while interpreting market vocabulary (wire strings, symbols)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("invalid log level `{0}`")]
    InvalidLogLevel(String),

    #[error("invalid setting `{key}`: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

impl MarketError {
    pub fn unknown(kind: &'static str, value: &str) -> Self {
        MarketError::UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}

/// Errors raised by feeds, stores and their schedulers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The batch source failed; the previous batch is kept.
    #[error("refresh of {feed} failed: {reason}")]
    RefreshFailed { feed: &'static str, reason: String },

    #[error("ticker `{0}` is already running")]
    TickerRunning(String),

    #[error("ticker `{0}` needs a non-zero period")]
    ZeroPeriod(String),

    #[error("ticker `{0}` task ended abnormally")]
    TickerPanicked(String),

    #[error("{0} has been disposed")]
    Disposed(&'static str),
}
