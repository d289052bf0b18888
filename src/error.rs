//! Error types
//!
//! Configuration errors are rejected before any computation runs. Feed errors
//! surface the supplier's "no data" condition to the caller; partial candles
//! never reach the analytics.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("RSI period must be at least 2, got {0}")]
    InvalidPeriod(usize),

    #[error("overbought threshold must be in (50, 100], got {0}")]
    InvalidOverbought(f64),

    #[error("oversold threshold must be in [0, 50), got {0}")]
    InvalidOversold(f64),

    #[error("overbought ({overbought}) must be greater than oversold ({oversold})")]
    InvertedThresholds { overbought: f64, oversold: f64 },

    #[error("proximity tolerance must be finite and in [0, 0.05), got {0}")]
    InvalidProximity(f64),

    #[error("debounce window must be at least 1 candle")]
    InvalidDebounce,

    #[error("extension ladder must be four strictly increasing positive multipliers")]
    InvalidLadder,

    #[error("poll interval must be at least 1 second")]
    InvalidPollInterval,

    #[error("UTC offset must be within +/-24h, got {0} minutes")]
    InvalidUtcOffset(i32),

    #[error("unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("malformed chart payload: {0}")]
    Parse(String),

    #[error("no candles available")]
    Empty,
}
