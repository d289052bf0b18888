//! Core types used throughout NiftyBot
//!
//! Defines candles, session levels, insights and the request parameters
//! shared with the candle supplier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported index symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "^NSEI")]
    Nifty50,
    #[serde(rename = "^NSEBANK")]
    NiftyBank,
}

impl Default for Symbol {
    fn default() -> Self {
        Symbol::Nifty50
    }
}

impl Symbol {
    /// Ticker as understood by the chart API (e.g., "^NSEI")
    pub fn ticker(&self) -> &'static str {
        match self {
            Symbol::Nifty50 => "^NSEI",
            Symbol::NiftyBank => "^NSEBANK",
        }
    }

    /// Human-readable index name
    pub fn display_name(&self) -> &'static str {
        match self {
            Symbol::Nifty50 => "NIFTY 50",
            Symbol::NiftyBank => "NIFTY BANK",
        }
    }

    /// Parse from ticker or name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "^NSEI" | "NSEI" | "NIFTY" | "NIFTY50" => Some(Symbol::Nifty50),
            "^NSEBANK" | "NSEBANK" | "BANKNIFTY" | "NIFTYBANK" => Some(Symbol::NiftyBank),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker())
    }
}

/// Candle interval requested from the supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Min1,
    Min5,
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Min1
    }
}

impl Interval {
    /// Get duration in seconds
    pub fn duration_secs(&self) -> u64 {
        match self {
            Interval::Min1 => 60,
            Interval::Min5 => 5 * 60,
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1m" | "1min" => Some(Interval::Min1),
            "5m" | "5min" => Some(Interval::Min5),
            _ => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Min1 => write!(f, "1m"),
            Interval::Min5 => write!(f, "5m"),
        }
    }
}

/// History range requested from the supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Range {
    Day1,
    Day5,
}

impl Default for Range {
    fn default() -> Self {
        Range::Day1
    }
}

impl Range {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1d" => Some(Range::Day1),
            "5d" => Some(Range::Day5),
            _ => None,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Day1 => write!(f, "1d"),
            Range::Day5 => write!(f, "5d"),
        }
    }
}

/// Candlestick data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in epoch seconds
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// All price fields are finite and high >= low
    pub fn is_well_formed(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
            && self.high >= self.low
    }
}

/// Which side of the opening range a level sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSide {
    Resistance,
    Support,
}

/// Name of one of the ten session levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelName {
    A,
    A1,
    A2,
    A3,
    A4,
    B,
    B1,
    B2,
    B3,
    B4,
}

impl LevelName {
    /// Resistance levels ordered by distance from A
    pub const RESISTANCE: [LevelName; 5] = [
        LevelName::A,
        LevelName::A1,
        LevelName::A2,
        LevelName::A3,
        LevelName::A4,
    ];

    /// Support levels ordered by distance from B
    pub const SUPPORT: [LevelName; 5] = [
        LevelName::B,
        LevelName::B1,
        LevelName::B2,
        LevelName::B3,
        LevelName::B4,
    ];

    pub fn side(&self) -> LevelSide {
        match self {
            LevelName::A | LevelName::A1 | LevelName::A2 | LevelName::A3 | LevelName::A4 => {
                LevelSide::Resistance
            }
            _ => LevelSide::Support,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelName::A => "A",
            LevelName::A1 => "A1",
            LevelName::A2 => "A2",
            LevelName::A3 => "A3",
            LevelName::A4 => "A4",
            LevelName::B => "B",
            LevelName::B1 => "B1",
            LevelName::B2 => "B2",
            LevelName::B3 => "B3",
            LevelName::B4 => "B4",
        }
    }
}

impl fmt::Display for LevelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session levels anchored to the opening range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct LevelSet {
    /// Opening-range high
    pub A: f64,
    /// Opening-range low
    pub B: f64,
    pub A1: f64,
    pub A2: f64,
    pub A3: f64,
    pub A4: f64,
    pub B1: f64,
    pub B2: f64,
    pub B3: f64,
    pub B4: f64,
}

impl LevelSet {
    pub fn get(&self, name: LevelName) -> f64 {
        match name {
            LevelName::A => self.A,
            LevelName::A1 => self.A1,
            LevelName::A2 => self.A2,
            LevelName::A3 => self.A3,
            LevelName::A4 => self.A4,
            LevelName::B => self.B,
            LevelName::B1 => self.B1,
            LevelName::B2 => self.B2,
            LevelName::B3 => self.B3,
            LevelName::B4 => self.B4,
        }
    }

    /// Width of the opening range
    pub fn range(&self) -> f64 {
        self.A - self.B
    }

    /// Flat opening range: every extension coincides with A or B
    pub fn is_degenerate(&self) -> bool {
        self.range() <= 0.0
    }

    /// All ten levels, resistance side first
    pub fn iter(&self) -> impl Iterator<Item = (LevelName, f64)> + '_ {
        LevelName::RESISTANCE
            .iter()
            .chain(LevelName::SUPPORT.iter())
            .map(move |&name| (name, self.get(name)))
    }

    /// Levels of one side, ordered by distance from the range
    pub fn side(&self, side: LevelSide) -> impl Iterator<Item = (LevelName, f64)> + '_ {
        let names: &'static [LevelName; 5] = match side {
            LevelSide::Resistance => &LevelName::RESISTANCE,
            LevelSide::Support => &LevelName::SUPPORT,
        };
        names.iter().map(move |&name| (name, self.get(name)))
    }

    /// B4 < B3 < B2 < B1 < B < A < A1 < A2 < A3 < A4
    pub fn is_strictly_ordered(&self) -> bool {
        let ladder = [
            self.B4, self.B3, self.B2, self.B1, self.B, self.A, self.A1, self.A2, self.A3, self.A4,
        ];
        ladder.windows(2).all(|w| w[0] < w[1])
    }
}

/// Insight direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "bullish"),
            Direction::Bearish => write!(f, "bearish"),
        }
    }
}

/// Insight category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightKind {
    /// Price at a resistance level while RSI is overbought
    ResistanceRejection,
    /// Price at a support level while RSI is oversold
    SupportBounce,
}

impl InsightKind {
    pub fn direction(&self) -> Direction {
        match self {
            InsightKind::ResistanceRejection => Direction::Bearish,
            InsightKind::SupportBounce => Direction::Bullish,
        }
    }

    pub fn side(&self) -> LevelSide {
        match self {
            InsightKind::ResistanceRejection => LevelSide::Resistance,
            InsightKind::SupportBounce => LevelSide::Support,
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightKind::ResistanceRejection => write!(f, "resistance-rejection"),
            InsightKind::SupportBounce => write!(f, "support-bounce"),
        }
    }
}

/// A confluence event detected at a specific historical candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub direction: Direction,
    pub message: String,
    /// Epoch seconds of the triggering candle
    pub time: i64,
    /// Close of the triggering candle
    pub price: f64,
    pub rsi: f64,
    pub level_name: LevelName,
}

/// Read-only result of one full recomputation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: Symbol,
    pub generated_at: DateTime<Utc>,
    pub candles: Vec<Candle>,
    pub rsi: Vec<Option<f64>>,
    pub levels: Option<LevelSet>,
    pub insights: Vec<SignalInsight>,
}

impl Snapshot {
    pub fn latest_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}
