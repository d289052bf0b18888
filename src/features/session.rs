//! Per-session memo of the opening-range levels

use chrono::{FixedOffset, NaiveDate, TimeZone};

use super::levels::{derive_levels_with, LevelLadder};
use crate::error::ConfigError;
use crate::types::{Candle, LevelSet, Symbol};

/// Identifies one trading session of one symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub symbol: Symbol,
    pub date: NaiveDate,
}

/// Caches the LevelSet once the opening range of a session is complete.
///
/// The levels never change for the rest of the session; a candle sequence
/// that starts on a different exchange-local date starts a new session.
#[derive(Debug, Clone)]
pub struct SessionLevelCache {
    offset: FixedOffset,
    ladder: LevelLadder,
    current: Option<(SessionKey, LevelSet)>,
}

impl SessionLevelCache {
    pub fn new(utc_offset_minutes: i32) -> Result<Self, ConfigError> {
        Ok(Self {
            offset: exchange_offset(utc_offset_minutes)?,
            ladder: LevelLadder::default(),
            current: None,
        })
    }

    pub fn with_ladder(mut self, ladder: LevelLadder) -> Self {
        self.ladder = ladder;
        self.current = None;
        self
    }

    /// Session of a candle sequence, keyed by its first candle
    pub fn session_key(&self, symbol: Symbol, candles: &[Candle]) -> Option<SessionKey> {
        let first = candles.first()?;
        let date = self
            .offset
            .timestamp_opt(first.time, 0)
            .single()?
            .date_naive();
        Some(SessionKey { symbol, date })
    }

    /// Cached levels for this session, deriving them once the range is complete
    pub fn get_or_derive(&mut self, symbol: Symbol, candles: &[Candle]) -> Option<LevelSet> {
        let key = self.session_key(symbol, candles)?;

        if let Some((cached_key, levels)) = &self.current {
            if *cached_key == key {
                return Some(*levels);
            }
        }

        let levels = derive_levels_with(candles, &self.ladder)?;
        tracing::info!(
            symbol = %symbol,
            session = %key.date,
            a = levels.A,
            b = levels.B,
            "Session levels derived"
        );
        self.current = Some((key, levels));
        Some(levels)
    }

    pub fn current(&self) -> Option<&(SessionKey, LevelSet)> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Exchange timezone from a UTC offset in minutes
pub fn exchange_offset(utc_offset_minutes: i32) -> Result<FixedOffset, ConfigError> {
    utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or(ConfigError::InvalidUtcOffset(utc_offset_minutes))
}
