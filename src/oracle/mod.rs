//! Oracle module - Candle supply for the analytics
//!
//! Fetches intraday candles from the upstream chart API and hands the
//! analytics a validated, strictly time-ordered sequence. Any upstream or
//! payload failure surfaces as a `FeedError` so partial data never reaches
//! the core.

mod candles;
pub mod sources;

pub use candles::sanitize_candles;
pub use sources::{candles_from_chart, ChartResponse, YahooChartClient};

use async_trait::async_trait;

use crate::error::FeedError;
use crate::types::{Candle, Interval, Range, Symbol};

/// Supplier of candle sequences
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Get the source name
    fn name(&self) -> &'static str;

    /// Fetch the ordered candle sequence for a symbol/interval/range
    async fn fetch_candles(
        &self,
        symbol: Symbol,
        interval: Interval,
        range: crate::types::Range,
    ) -> Result<Vec<Candle>, FeedError>;
}

/// Fixed in-memory candle source, for replays and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    candles: Vec<Candle>,
}

impl StaticSource {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles: sanitize_candles(candles),
        }
    }
}

#[async_trait]
impl CandleSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_candles(
        &self,
        _symbol: Symbol,
        _interval: Interval,
        _range: Range,
    ) -> Result<Vec<Candle>, FeedError> {
        if self.candles.is_empty() {
            return Err(FeedError::Empty);
        }
        Ok(self.candles.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_returns_sanitized() {
        let source = StaticSource::new(vec![
            Candle::new(120, 1.0, 2.0, 0.5, 1.5, 0.0),
            Candle::new(60, 1.0, 2.0, 0.5, 1.5, 0.0),
        ]);
        let candles = tokio_test::block_on(source.fetch_candles(
            Symbol::Nifty50,
            Interval::Min1,
            Range::Day1,
        ))
        .unwrap();
        assert_eq!(candles.iter().map(|c| c.time).collect::<Vec<_>>(), vec![60, 120]);
    }

    #[test]
    fn test_static_source_empty_is_no_data() {
        let source = StaticSource::default();
        let result = tokio_test::block_on(source.fetch_candles(
            Symbol::Nifty50,
            Interval::Min1,
            Range::Day1,
        ));
        assert!(matches!(result, Err(FeedError::Empty)));
    }
}
