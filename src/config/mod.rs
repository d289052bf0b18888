//! Configuration management for NiftyBot
//!
//! Loads from optional config files + environment variables via .env

mod types;

pub use types::*;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::features::exchange_offset;
use crate::types::{Interval, Range, Symbol};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub rsi: RsiThresholds,
    pub signals: SignalPolicy,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Index ticker (^NSEI, ^NSEBANK)
    pub symbol: String,
    /// Candle interval (1m, 5m)
    pub interval: String,
    /// History range (1d, 5d)
    pub range: String,
    /// Chart API base URL
    pub base_url: String,
    /// Refresh cadence in seconds
    pub poll_interval_secs: u64,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl FeedConfig {
    pub fn symbol(&self) -> Result<Symbol, ConfigError> {
        Symbol::from_str(&self.symbol).ok_or_else(|| ConfigError::UnknownValue {
            field: "feed.symbol",
            value: self.symbol.clone(),
        })
    }

    pub fn interval(&self) -> Result<Interval, ConfigError> {
        Interval::from_str(&self.interval).ok_or_else(|| ConfigError::UnknownValue {
            field: "feed.interval",
            value: self.interval.clone(),
        })
    }

    pub fn range(&self) -> Result<Range, ConfigError> {
        Range::from_str(&self.range).ok_or_else(|| ConfigError::UnknownValue {
            field: "feed.range",
            value: self.range.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Exchange offset from UTC in minutes (IST = +330)
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
    /// Emit JSON log lines
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Print every snapshot as a JSON line on stdout
    pub json_snapshots: bool,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Feed defaults
            .set_default("feed.symbol", "^NSEI")?
            .set_default("feed.interval", "1m")?
            .set_default("feed.range", "1d")?
            .set_default("feed.base_url", "https://query2.finance.yahoo.com")?
            .set_default("feed.poll_interval_secs", 15)?
            .set_default("feed.request_timeout_secs", 10)?
            // RSI defaults
            .set_default("rsi.period", 14)?
            .set_default("rsi.overbought", 70.0)?
            .set_default("rsi.oversold", 30.0)?
            // Signal policy defaults
            .set_default("signals.proximity_pct", 0.0005)?
            .set_default("signals.debounce_bars", 5)?
            // Session defaults
            .set_default("session.utc_offset_minutes", 330)?
            // Logging defaults
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("output.json_snapshots", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (NIFTYBOT__*)
            .add_source(Environment::with_prefix("NIFTYBOT").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config
            .validate()
            .context("Invalid configuration")?;

        Ok(app_config)
    }

    /// Reject invalid values before they reach the analytics
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.feed.symbol()?;
        self.feed.interval()?;
        self.feed.range()?;
        if self.feed.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        exchange_offset(self.session.utc_offset_minutes)?;
        self.analytics().validate()
    }

    pub fn analytics(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            rsi: self.rsi,
            signals: self.signals,
        }
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "symbol={} interval={} range={} poll={}s rsi={}/{:.0}/{:.0} proximity={:.4}% debounce={}",
            self.feed.symbol,
            self.feed.interval,
            self.feed.range,
            self.feed.poll_interval_secs,
            self.rsi.period,
            self.rsi.overbought,
            self.rsi.oversold,
            self.signals.proximity_pct * 100.0,
            self.signals.debounce_bars
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            feed: FeedConfig {
                symbol: "^NSEI".to_string(),
                interval: "1m".to_string(),
                range: "1d".to_string(),
                base_url: "https://query2.finance.yahoo.com".to_string(),
                poll_interval_secs: 15,
                request_timeout_secs: 10,
            },
            rsi: RsiThresholds::default(),
            signals: SignalPolicy::default(),
            session: SessionConfig {
                utc_offset_minutes: 330,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            output: OutputConfig {
                json_snapshots: false,
            },
        }
    }

    #[test]
    fn test_sample_config_valid() {
        let config = sample_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.feed.symbol().unwrap(), Symbol::Nifty50);
        assert!(config.digest().contains("rsi=14/70/30"));
    }

    #[test]
    fn test_unknown_interval_rejected() {
        let mut config = sample_config();
        config.feed.interval = "15m".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownValue {
                field: "feed.interval",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = sample_config();
        config.feed.poll_interval_secs = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPollInterval));
    }

    #[test]
    fn test_threshold_errors_propagate() {
        let mut config = sample_config();
        config.rsi.overbought = 45.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidOverbought(45.0))
        );
    }

    #[test]
    fn test_out_of_range_utc_offset_rejected() {
        let mut config = sample_config();
        config.session.utc_offset_minutes = 1_500;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidUtcOffset(1_500))
        );
        config.session.utc_offset_minutes = -300;
        assert!(config.validate().is_ok());
    }
}
