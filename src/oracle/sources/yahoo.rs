//! Yahoo Finance chart API client
//!
//! GET {base}/v8/finance/chart/{ticker}?interval=1m&range=1d&includePrePost=false

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::oracle::{sanitize_candles, CandleSource};
use crate::types::{Candle, Interval, Range, Symbol};

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; NiftyBot/0.1; +https://github.com/niftybot/niftybot)";

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    /// Missing when the market has not traded yet in the range
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// Convert a chart payload into a validated candle sequence.
///
/// Bars with a null or non-finite open/high/low/close are dropped; a null
/// volume becomes 0.
pub fn candles_from_chart(response: &ChartResponse) -> Result<Vec<Candle>, FeedError> {
    if let Some(error) = &response.chart.error {
        return Err(FeedError::Parse(format!(
            "{}: {}",
            error.code.as_deref().unwrap_or("error"),
            error.description.as_deref().unwrap_or("")
        )));
    }

    let result = response
        .chart
        .result
        .as_ref()
        .and_then(|r| r.first())
        .ok_or_else(|| FeedError::Parse("missing chart.result[0]".to_string()))?;
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| FeedError::Parse("missing indicators.quote[0]".to_string()))?;

    let candles = result
        .timestamp
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(idx, &time)| {
            let open = value(&quote.open, idx)?;
            let high = value(&quote.high, idx)?;
            let low = value(&quote.low, idx)?;
            let close = value(&quote.close, idx)?;
            let volume = value(&quote.volume, idx).unwrap_or(0.0);
            Some(Candle::new(time, open, high, low, close, volume))
        })
        .collect();

    let candles = sanitize_candles(candles);
    if candles.is_empty() {
        return Err(FeedError::Empty);
    }
    Ok(candles)
}

fn value(series: &[Option<f64>], idx: usize) -> Option<f64> {
    series.get(idx).copied().flatten()
}

/// HTTP client for the chart endpoint
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://finance.yahoo.com/"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Chart URL with the ticker as the last path segment
    pub fn chart_url(&self, symbol: Symbol) -> Result<Url, FeedError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FeedError::Parse(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                FeedError::Parse(format!("base url cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol.ticker()]);
        Ok(url)
    }
}

#[async_trait]
impl CandleSource for YahooChartClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_candles(
        &self,
        symbol: Symbol,
        interval: Interval,
        range: Range,
    ) -> Result<Vec<Candle>, FeedError> {
        let url = self.chart_url(symbol)?;
        let interval = interval.to_string();
        let range = range.to_string();
        let params = [
            ("interval", interval.as_str()),
            ("range", range.as_str()),
            ("includePrePost", "false"),
        ];

        let response = self.client.get(url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                source = "yahoo",
                symbol = %symbol,
                status = status.as_u16(),
                "Chart request failed"
            );
            return Err(FeedError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: ChartResponse =
            serde_json::from_str(&body).map_err(|e| FeedError::Parse(e.to_string()))?;
        let candles = candles_from_chart(&payload)?;

        debug!(
            source = "yahoo",
            symbol = %symbol,
            candle_count = candles.len(),
            "Fetched candles"
        );
        Ok(candles)
    }
}
