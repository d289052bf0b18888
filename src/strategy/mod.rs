//! Signal Engine - confluence rules between price, session levels and RSI
//!
//! A candle produces an insight when its close is at a session level and RSI
//! confirms the exhaustion on that side:
//! - resistance (A, A1..A4) with RSI >= overbought -> bearish `resistance-rejection`
//! - support (B, B1..B4) with RSI <= oversold -> bullish `support-bounce`
//!
//! "At a level" means within `level * proximity_pct` of it, or crossed on this
//! candle (previous close on the other side). When several levels of one side
//! qualify, the nearest one wins. Repeated insights for the same kind and level
//! are debounced by `debounce_bars` candles.
//!
//! The engine keeps no state between calls: every call walks the full
//! sequence, and only earlier candles influence a decision, so appending
//! candles never rewrites earlier insights.

pub mod pipeline;
pub use pipeline::{run_pipeline, run_pipeline_with_levels};

use std::collections::HashMap;

use crate::config::{RsiThresholds, SignalPolicy};
use crate::features::OPENING_RANGE_BARS;
use crate::types::{Candle, InsightKind, LevelName, LevelSet, LevelSide, SignalInsight};

/// Stateless confluence detector
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    policy: SignalPolicy,
}

impl SignalEngine {
    pub fn new(policy: SignalPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SignalPolicy {
        &self.policy
    }

    /// Produce the full insight sequence for the given candles.
    ///
    /// Returns an empty sequence when the levels are not ready or the inputs
    /// are too short.
    pub fn analyze(
        &self,
        candles: &[Candle],
        levels: Option<&LevelSet>,
        rsi: &[Option<f64>],
        thresholds: &RsiThresholds,
    ) -> Vec<SignalInsight> {
        let Some(levels) = levels else {
            tracing::debug!(candle_count = candles.len(), "Signals: levels not ready");
            return Vec::new();
        };

        let len = candles.len().min(rsi.len());
        let mut insights = Vec::new();
        let mut last_emitted: HashMap<(InsightKind, LevelName), usize> = HashMap::new();

        for i in OPENING_RANGE_BARS..len {
            let Some(rsi_value) = rsi[i].filter(|v| v.is_finite()) else {
                continue;
            };
            let candle = &candles[i];
            let prev_close = candles[i - 1].close;

            for kind in [InsightKind::ResistanceRejection, InsightKind::SupportBounce] {
                if !Self::momentum_confirms(kind, rsi_value, thresholds) {
                    continue;
                }
                let Some((level_name, level)) =
                    self.level_hit(levels, kind.side(), prev_close, candle.close)
                else {
                    continue;
                };

                let key = (kind, level_name);
                if let Some(&last) = last_emitted.get(&key) {
                    if i - last < self.policy.debounce_bars {
                        tracing::trace!(
                            kind = %kind,
                            level = %level_name,
                            index = i,
                            last_index = last,
                            "Signals: debounced"
                        );
                        continue;
                    }
                }
                last_emitted.insert(key, i);

                insights.push(SignalInsight {
                    kind,
                    direction: kind.direction(),
                    message: Self::describe(
                        kind,
                        level_name,
                        level,
                        candle.close,
                        rsi_value,
                        thresholds,
                    ),
                    time: candle.time,
                    price: candle.close,
                    rsi: rsi_value,
                    level_name,
                });
            }
        }

        insights
    }

    /// RSI at or beyond the threshold on the side of the level
    pub fn momentum_confirms(kind: InsightKind, rsi: f64, thresholds: &RsiThresholds) -> bool {
        match kind {
            InsightKind::ResistanceRejection => rsi >= thresholds.overbought,
            InsightKind::SupportBounce => rsi <= thresholds.oversold,
        }
    }

    /// Whether `price` is within the proximity tolerance of `level`
    pub fn is_near(&self, price: f64, level: f64) -> bool {
        (price - level).abs() <= level.abs() * self.policy.proximity_pct
    }

    /// Close crossed the level on this candle, moving away from the range
    fn crossed(side: LevelSide, prev_close: f64, close: f64, level: f64) -> bool {
        match side {
            LevelSide::Resistance => prev_close < level && level <= close,
            LevelSide::Support => prev_close > level && level >= close,
        }
    }

    /// Nearest level of `side` the close is at, if any
    pub fn level_hit(
        &self,
        levels: &LevelSet,
        side: LevelSide,
        prev_close: f64,
        close: f64,
    ) -> Option<(LevelName, f64)> {
        let mut best: Option<(LevelName, f64, f64)> = None;

        for (name, level) in levels.side(side) {
            if !self.is_near(close, level) && !Self::crossed(side, prev_close, close, level) {
                continue;
            }
            let distance = (close - level).abs();
            match best {
                Some((_, _, best_distance)) if best_distance <= distance => {}
                _ => best = Some((name, level, distance)),
            }
        }

        best.map(|(name, level, _)| (name, level))
    }

    fn describe(
        kind: InsightKind,
        level_name: LevelName,
        level: f64,
        price: f64,
        rsi: f64,
        thresholds: &RsiThresholds,
    ) -> String {
        match kind {
            InsightKind::ResistanceRejection => format!(
                "Bearish confluence: price {:.2} at resistance {} ({:.2}) with RSI {:.1} ≥ {:.0}",
                price, level_name, level, rsi, thresholds.overbought
            ),
            InsightKind::SupportBounce => format!(
                "Bullish confluence: price {:.2} at support {} ({:.2}) with RSI {:.1} ≤ {:.0}",
                price, level_name, level, rsi, thresholds.oversold
            ),
        }
    }
}

/// Run the signal engine with the default policy
pub fn analyze_signals(
    candles: &[Candle],
    levels: Option<&LevelSet>,
    rsi: &[Option<f64>],
    thresholds: &RsiThresholds,
) -> Vec<SignalInsight> {
    SignalEngine::default().analyze(candles, levels, rsi, thresholds)
}
