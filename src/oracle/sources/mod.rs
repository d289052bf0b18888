//! Candle source implementations (Yahoo Finance chart API)

mod yahoo;

pub use yahoo::{candles_from_chart, ChartResponse, YahooChartClient};
