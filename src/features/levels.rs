//! Opening-range levels
//!
//! `A`/`B` are the high/low of the first five candles of the session. The
//! extension levels sit at fixed multiples of the range width above `A` and
//! below `B`.

use crate::error::ConfigError;
use crate::types::{Candle, LevelSet};

/// Number of candles forming the opening range
pub const OPENING_RANGE_BARS: usize = 5;

/// Default extension multipliers (Fibonacci extensions of the range)
pub const EXTENSION_LADDER: [f64; 4] = [0.272, 0.618, 1.0, 1.618];

/// Four strictly increasing positive multipliers of the opening-range width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelLadder([f64; 4]);

impl LevelLadder {
    pub fn new(multipliers: [f64; 4]) -> Result<Self, ConfigError> {
        let positive = multipliers.iter().all(|m| m.is_finite() && *m > 0.0);
        let increasing = multipliers.windows(2).all(|w| w[0] < w[1]);
        if !positive || !increasing {
            return Err(ConfigError::InvalidLadder);
        }
        Ok(Self(multipliers))
    }

    pub fn multipliers(&self) -> [f64; 4] {
        self.0
    }
}

impl Default for LevelLadder {
    fn default() -> Self {
        Self(EXTENSION_LADDER)
    }
}

/// Derive the session levels with the default ladder.
///
/// Returns `None` until the opening range is complete.
pub fn derive_levels(candles: &[Candle]) -> Option<LevelSet> {
    derive_levels_with(candles, &LevelLadder::default())
}

/// Derive the session levels from the first five candles only
pub fn derive_levels_with(candles: &[Candle], ladder: &LevelLadder) -> Option<LevelSet> {
    if candles.len() < OPENING_RANGE_BARS {
        tracing::debug!(
            candle_count = candles.len(),
            required = OPENING_RANGE_BARS,
            "Levels: opening range not complete"
        );
        return None;
    }

    let opening = &candles[..OPENING_RANGE_BARS];
    let a = opening
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let b = opening.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

    // A flat range collapses every extension onto A/B
    let range = (a - b).max(0.0);
    let [m1, m2, m3, m4] = ladder.multipliers();

    Some(LevelSet {
        A: a,
        B: b,
        A1: a + m1 * range,
        A2: a + m2 * range,
        A3: a + m3 * range,
        A4: a + m4 * range,
        B1: b - m1 * range,
        B2: b - m2 * range,
        B3: b - m3 * range,
        B4: b - m4 * range,
    })
}
