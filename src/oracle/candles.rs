//! Candle sequence validation
//!
//! The analytics assume strictly increasing timestamps and finite prices.

use crate::types::Candle;

/// Sort by time, drop malformed bars and duplicate timestamps (first wins)
pub fn sanitize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    let before = candles.len();

    candles.retain(Candle::is_well_formed);
    // Stable sort keeps the first occurrence of a timestamp in front
    candles.sort_by_key(|c| c.time);
    candles.dedup_by_key(|c| c.time);

    for candle in candles.iter_mut() {
        if !candle.volume.is_finite() || candle.volume < 0.0 {
            candle.volume = 0.0;
        }
    }

    let dropped = before - candles.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = candles.len(), "Candles: dropped invalid bars");
    }

    candles
}
