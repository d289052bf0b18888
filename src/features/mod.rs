//! Feature Engine - Technical analytics computed from candle data
//!
//! - RSI (Wilder's smoothing), index-aligned with the close series
//! - Opening-range levels (A/B plus four extensions on each side)
//! - Per-session memo of the levels for the polling driver
//!
//! Everything here except `SessionLevelCache` is a pure function of its input.

pub mod levels;
pub mod rsi;
pub mod session;

pub use levels::{
    derive_levels, derive_levels_with, LevelLadder, EXTENSION_LADDER, OPENING_RANGE_BARS,
};
pub use rsi::{compute_rsi, latest_rsi};
pub use session::{exchange_offset, SessionKey, SessionLevelCache};

use crate::types::Candle;

/// Close prices of a candle sequence
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
