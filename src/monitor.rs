//! Monitor - periodic recomputation driver
//!
//! Polls the candle source on a fixed cadence, memoizes the session levels,
//! recomputes the full pipeline and publishes each snapshot on a watch
//! channel. Refreshes run sequentially, so at most one recomputation is in
//! flight; a refresh that overruns the poll interval is dropped.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{AnalyticsConfig, AppConfig};
use crate::error::ConfigError;
use crate::features::{latest_rsi, SessionLevelCache};
use crate::oracle::CandleSource;
use crate::strategy::run_pipeline_with_levels;
use crate::types::{Interval, Range, SignalInsight, Snapshot, Symbol};

/// What to poll and how to analyze it
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub symbol: Symbol,
    pub interval: Interval,
    pub range: Range,
    pub poll_interval: Duration,
    pub analytics: AnalyticsConfig,
    pub utc_offset_minutes: i32,
}

impl MonitorSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            symbol: config.feed.symbol()?,
            interval: config.feed.interval()?,
            range: config.feed.range()?,
            poll_interval: Duration::from_secs(config.feed.poll_interval_secs),
            analytics: config.analytics(),
            utc_offset_minutes: config.session.utc_offset_minutes,
        })
    }
}

/// Latest published snapshot, `None` until the first successful refresh
pub type SnapshotReceiver = watch::Receiver<Option<Arc<Snapshot>>>;

pub struct Monitor<S: CandleSource> {
    source: S,
    settings: MonitorSettings,
    levels: SessionLevelCache,
    /// Time of the newest insight already reported
    last_reported: Option<i64>,
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
}

impl<S: CandleSource> Monitor<S> {
    pub fn new(source: S, settings: MonitorSettings) -> Result<Self, ConfigError> {
        let levels = SessionLevelCache::new(settings.utc_offset_minutes)?;
        let (snapshot_tx, _) = watch::channel(None);
        Ok(Self {
            source,
            settings,
            levels,
            last_reported: None,
            snapshot_tx,
        })
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshot_tx.subscribe()
    }

    /// Latest published snapshot
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.snapshot_tx.borrow().clone()
    }

    /// Fetch once and recompute everything.
    ///
    /// Returns `Ok(None)` when the source has no data; the previous snapshot
    /// stays published.
    pub async fn refresh(&mut self) -> Result<Option<Arc<Snapshot>>> {
        let MonitorSettings {
            symbol,
            interval,
            range,
            ..
        } = self.settings;

        let candles = match self.source.fetch_candles(symbol, interval, range).await {
            Ok(candles) => candles,
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    symbol = %symbol,
                    error = %e,
                    "No candle data this tick"
                );
                return Ok(None);
            }
        };

        let levels = self.levels.get_or_derive(symbol, &candles);
        let snapshot = run_pipeline_with_levels(symbol, candles, &self.settings.analytics, levels)?;

        debug!(
            symbol = %symbol,
            candle_count = snapshot.candles.len(),
            last_close = ?snapshot.latest_close(),
            rsi = ?latest_rsi(&snapshot.rsi),
            levels_ready = snapshot.levels.is_some(),
            insight_count = snapshot.insights.len(),
            "Snapshot refreshed"
        );

        self.report_new_insights(&snapshot);

        let snapshot = Arc::new(snapshot);
        self.snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));
        Ok(Some(snapshot))
    }

    /// Insights newer than the last reported one
    pub fn new_insights<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a SignalInsight> {
        snapshot
            .insights
            .iter()
            .filter(|s| self.last_reported.map_or(true, |t| s.time > t))
            .collect()
    }

    fn report_new_insights(&mut self, snapshot: &Snapshot) {
        let fresh = self.new_insights(snapshot);
        for insight in &fresh {
            info!(
                symbol = %snapshot.symbol,
                kind = %insight.kind,
                direction = %insight.direction,
                level = %insight.level_name,
                time = insight.time,
                price = insight.price,
                rsi = insight.rsi,
                "{}", insight.message
            );
        }
        if let Some(newest) = fresh.iter().map(|s| s.time).max() {
            self.last_reported = Some(newest);
        }
    }

    /// Poll until `shutdown` flips to true or its sender is dropped
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let poll = self.settings.poll_interval;
        let mut ticker = tokio::time::interval(poll);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            source = self.source.name(),
            symbol = %self.settings.symbol,
            interval = %self.settings.interval,
            range = %self.settings.range,
            poll_secs = poll.as_secs(),
            "Monitor started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match tokio::time::timeout(poll, self.refresh()).await {
                        Ok(result) => {
                            result?;
                        }
                        Err(_) => {
                            warn!(
                                symbol = %self.settings.symbol,
                                poll_secs = poll.as_secs(),
                                "Refresh overran the poll interval, discarded"
                            );
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!(symbol = %self.settings.symbol, "Monitor stopping");
                        break;
                    }
                }
            }
        }

        Ok(())
    }
}
