//! Analytics configuration types
//!
//! These are re-applied on every recomputation, so each one validates itself
//! and the pipeline refuses to run with values that fail validation.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// RSI lookback and overbought/oversold thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    /// RSI lookback period (>= 2)
    pub period: usize,
    /// Overbought threshold, in (50, 100]
    pub overbought: f64,
    /// Oversold threshold, in [0, 50)
    pub oversold: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl RsiThresholds {
    pub fn new(period: usize, overbought: f64, oversold: f64) -> Result<Self, ConfigError> {
        let thresholds = Self {
            period,
            overbought,
            oversold,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period < 2 {
            return Err(ConfigError::InvalidPeriod(self.period));
        }
        if self.overbought <= self.oversold {
            return Err(ConfigError::InvertedThresholds {
                overbought: self.overbought,
                oversold: self.oversold,
            });
        }
        // NaN fails both range checks
        if !(self.overbought > 50.0 && self.overbought <= 100.0) {
            return Err(ConfigError::InvalidOverbought(self.overbought));
        }
        if !(self.oversold >= 0.0 && self.oversold < 50.0) {
            return Err(ConfigError::InvalidOversold(self.oversold));
        }
        Ok(())
    }
}

/// Proximity and debounce policy for the signal engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalPolicy {
    /// Price is "at" a level when within `level * proximity_pct` of it
    pub proximity_pct: f64,
    /// Minimum candle gap between two insights of the same kind and level
    pub debounce_bars: usize,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self {
            proximity_pct: 0.0005, // 0.05%, ~12 points on NIFTY at 24000
            debounce_bars: 5,
        }
    }
}

impl SignalPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.proximity_pct.is_finite() || !(0.0..0.05).contains(&self.proximity_pct) {
            return Err(ConfigError::InvalidProximity(self.proximity_pct));
        }
        if self.debounce_bars == 0 {
            return Err(ConfigError::InvalidDebounce);
        }
        Ok(())
    }
}

/// Everything the analytics pipeline needs per recomputation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub rsi: RsiThresholds,
    pub signals: SignalPolicy,
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rsi.validate()?;
        self.signals.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_valid() {
        assert!(RsiThresholds::default().validate().is_ok());
        assert!(SignalPolicy::default().validate().is_ok());
        assert!(AnalyticsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_period_below_two_rejected() {
        assert_eq!(
            RsiThresholds::new(1, 70.0, 30.0),
            Err(ConfigError::InvalidPeriod(1))
        );
        assert!(RsiThresholds::new(2, 70.0, 30.0).is_ok());
    }

    #[test]
    fn test_threshold_ranges() {
        assert_eq!(
            RsiThresholds::new(14, 50.0, 30.0),
            Err(ConfigError::InvalidOverbought(50.0))
        );
        assert_eq!(
            RsiThresholds::new(14, 100.5, 30.0),
            Err(ConfigError::InvalidOverbought(100.5))
        );
        assert!(RsiThresholds::new(14, 100.0, 0.0).is_ok());
        assert_eq!(
            RsiThresholds::new(14, 70.0, 50.0),
            Err(ConfigError::InvalidOversold(50.0))
        );
        assert_eq!(
            RsiThresholds::new(14, 70.0, -1.0),
            Err(ConfigError::InvalidOversold(-1.0))
        );
        assert!(matches!(
            RsiThresholds::new(14, f64::NAN, 30.0),
            Err(ConfigError::InvalidOverbought(_))
        ));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        assert_eq!(
            RsiThresholds::new(14, 40.0, 45.0),
            Err(ConfigError::InvertedThresholds {
                overbought: 40.0,
                oversold: 45.0,
            })
        );
        assert_eq!(
            RsiThresholds::new(14, 30.0, 30.0),
            Err(ConfigError::InvertedThresholds {
                overbought: 30.0,
                oversold: 30.0,
            })
        );
    }

    #[test]
    fn test_policy_validation() {
        let mut policy = SignalPolicy::default();
        policy.debounce_bars = 0;
        assert_eq!(policy.validate(), Err(ConfigError::InvalidDebounce));

        let mut policy = SignalPolicy::default();
        policy.proximity_pct = -0.001;
        assert!(policy.validate().is_err());
        policy.proximity_pct = f64::INFINITY;
        assert!(policy.validate().is_err());
        policy.proximity_pct = 0.0;
        assert!(policy.validate().is_ok());
    }
}
