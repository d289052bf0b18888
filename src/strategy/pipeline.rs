//! Full recomputation: candles -> {RSI, levels} -> insights

use chrono::Utc;

use super::SignalEngine;
use crate::config::AnalyticsConfig;
use crate::error::ConfigError;
use crate::features::{closes, compute_rsi, derive_levels};
use crate::types::{Candle, LevelSet, Snapshot, Symbol};

/// Run the pipeline, deriving the levels from the first five candles
pub fn run_pipeline(
    symbol: Symbol,
    candles: Vec<Candle>,
    config: &AnalyticsConfig,
) -> Result<Snapshot, ConfigError> {
    let levels = derive_levels(&candles);
    run_pipeline_with_levels(symbol, candles, config, levels)
}

/// Run the pipeline with levels supplied by the caller (e.g. a session memo).
///
/// `levels == None` means the opening range is not complete yet; the snapshot
/// then carries the RSI but no insights.
pub fn run_pipeline_with_levels(
    symbol: Symbol,
    candles: Vec<Candle>,
    config: &AnalyticsConfig,
    levels: Option<LevelSet>,
) -> Result<Snapshot, ConfigError> {
    config.validate()?;

    let rsi = compute_rsi(&closes(&candles), config.rsi.period)?;
    let insights =
        SignalEngine::new(config.signals).analyze(&candles, levels.as_ref(), &rsi, &config.rsi);

    tracing::debug!(
        symbol = %symbol,
        candle_count = candles.len(),
        levels_ready = levels.is_some(),
        insight_count = insights.len(),
        "Pipeline recomputed"
    );

    Ok(Snapshot {
        symbol,
        generated_at: Utc::now(),
        candles,
        rsi,
        levels,
        insights,
    })
}
