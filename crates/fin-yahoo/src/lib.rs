#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance data provider.
//!
//! This crate provides a Yahoo Finance data provider that implements the
//! [`DataProvider`] and [`PriceDataProvider`] traits from `fin-core`.
//!
//! # Features
//!
//! - Quote snapshot and OHLCV history from Yahoo Finance's v8 chart API
//! - Built-in rate limiting (1 request per 10 seconds by default)
//! - Average volume over the most recent 60 bars
//!
//! # Example
//!
//! ```no_run
//! use fin_yahoo::YahooProvider;
//! use fin_core::{ChartInterval, ChartRange, PriceDataProvider, Symbol};
//!
//! # async fn example() -> fin_core::Result<()> {
//! let provider = YahooProvider::new()?;
//! let data = provider
//!     .stock_data(&Symbol::new("AAPL"), ChartRange::SixMonths, ChartInterval::Daily)
//!     .await?;
//! println!("{} bars, last price {}", data.history.len(), data.quote.price);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use fin_core::{
    ChartInterval, ChartRange, DataProvider, FinError, PriceDataProvider, PricePoint,
    RateLimiter, Result, StockData, StockQuote, Symbol,
};
use serde::Deserialize;
use tracing::debug;

/// Yahoo Finance chart API base URL.
const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Provider name used in errors and logs.
const PROVIDER: &str = "Yahoo Finance";

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Default rate limit: one request every 10 seconds.
pub const DEFAULT_RATE: f64 = 0.1;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Number of most recent bars averaged for the quote's volume.
const AVG_VOLUME_WINDOW: usize = 60;

/// Yahoo Finance data provider.
///
/// Implements [`DataProvider`] and [`PriceDataProvider`].
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider with default settings.
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_RATE, DEFAULT_TIMEOUT)
    }

    /// Create a provider with an explicit rate (requests/second) and timeout.
    pub fn with_options(rate: f64, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FinError::upstream(PROVIDER, format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, rate))
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    ///
    /// Uses the provided client for all HTTP requests. Rate limiting
    /// is still applied.
    #[must_use]
    pub fn with_client(client: reqwest::Client, rate: f64) -> Self {
        Self {
            client,
            limiter: Arc::new(RateLimiter::per_second(rate)),
        }
    }

    /// Build the chart API URL for a symbol.
    fn build_chart_url(symbol: &Symbol, range: ChartRange, interval: ChartInterval) -> String {
        format!(
            "{CHART_API_URL}/{}?range={range}&interval={interval}",
            symbol.as_str()
        )
    }
}

/// Parse a chart response into a quote plus history.
fn parse_chart_response(
    symbol: &Symbol,
    response: ChartResponse,
    range: ChartRange,
    interval: ChartInterval,
) -> Result<StockData> {
    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Err(FinError::NotFound(format!("ticker \"{symbol}\" on Yahoo Finance")));
        }
        return Err(FinError::upstream(
            PROVIDER,
            format!("{}: {}", error.code, error.description),
        ));
    }

    let result = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| FinError::NotFound(format!("ticker \"{symbol}\" on Yahoo Finance")))?;

    let history = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|quote| quote.into_history(&result.timestamp.unwrap_or_default()))
        .unwrap_or_default();

    let meta = result.meta;
    let price = meta.regular_market_price.unwrap_or_default();
    let previous_close = meta
        .previous_close
        .or(meta.chart_previous_close)
        .unwrap_or_default();
    let change = price - previous_close;
    let change_percent = if previous_close == 0.0 {
        0.0
    } else {
        change / previous_close * 100.0
    };

    let recent = &history[history.len().saturating_sub(AVG_VOLUME_WINDOW)..];
    let avg_volume = if recent.is_empty() {
        0
    } else {
        (recent.iter().map(|p| p.volume as f64).sum::<f64>() / recent.len() as f64).round() as u64
    };

    let quote = StockQuote {
        ticker: symbol.to_string(),
        name: meta
            .short_name
            .or(meta.long_name)
            .unwrap_or_else(|| symbol.to_string()),
        price,
        change,
        change_percent,
        market_cap: None,
        pe_ratio: None,
        forward_pe: None,
        dividend_yield: None,
        fifty_two_week_high: meta.fifty_two_week_high.unwrap_or_default(),
        fifty_two_week_low: meta.fifty_two_week_low.unwrap_or_default(),
        avg_volume,
        beta: None,
    };

    Ok(StockData {
        quote,
        history,
        range,
        interval,
    })
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn description(&self) -> &str {
        "Yahoo Finance quotes and OHLCV price history"
    }
}

#[async_trait]
impl PriceDataProvider for YahooProvider {
    async fn stock_data(
        &self,
        symbol: &Symbol,
        range: ChartRange,
        interval: ChartInterval,
    ) -> Result<StockData> {
        if symbol.as_str().is_empty() {
            return Err(FinError::InvalidArgument("empty ticker".to_string()));
        }

        // Apply rate limiting
        self.limiter.acquire().await;

        let url = Self::build_chart_url(symbol, range, interval);
        debug!(url, "Fetching chart");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FinError::upstream(PROVIDER, e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FinError::NotFound(format!("ticker \"{symbol}\" on Yahoo Finance")));
        }
        if !status.is_success() {
            return Err(FinError::upstream(
                PROVIDER,
                format!("HTTP {status} for {symbol}"),
            ));
        }

        let chart_response: ChartResponse = response
            .json()
            .await
            .map_err(|e| FinError::upstream(PROVIDER, format!("failed to parse chart: {e}")))?;

        parse_chart_response(symbol, chart_response, range, interval)
    }
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

/// Chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    short_name: Option<String>,
    long_name: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl QuoteData {
    /// Zips the columns with `timestamps`, skipping bars without a close.
    fn into_history(self, timestamps: &[i64]) -> Vec<PricePoint> {
        let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();
        timestamps
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                let close = at(&self.close, i)?;
                let date = DateTime::from_timestamp(ts, 0)?.date_naive();
                Some(PricePoint {
                    date,
                    open: at(&self.open, i).unwrap_or_default(),
                    high: at(&self.high, i).unwrap_or_default(),
                    low: at(&self.low, i).unwrap_or_default(),
                    close,
                    volume: at(&self.volume, i).unwrap_or_default().max(0.0) as u64,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    const CHART: &str = r#"{"chart": {"result": [{
        "meta": {
            "currency": "USD", "symbol": "AAPL", "shortName": "Apple Inc.",
            "regularMarketPrice": 210.0, "chartPreviousClose": 180.0, "previousClose": 200.0,
            "fiftyTwoWeekHigh": 220.5, "fiftyTwoWeekLow": 164.1
        },
        "timestamp": [1717032600, 1717119000, 1717205400, 1717464600],
        "indicators": {"quote": [{
            "open":   [190.0, 191.0, null, 194.0],
            "high":   [192.0, 193.0, null, 196.0],
            "low":    [189.0, 190.0, null, 193.0],
            "close":  [191.5, 192.5, null, 195.0],
            "volume": [1000, 3000, null, 2000]
        }]}
    }], "error": null}}"#;

    fn parse(json: &str) -> Result<StockData> {
        let response: ChartResponse = serde_json::from_str(json).unwrap();
        parse_chart_response(
            &Symbol::new("aapl"),
            response,
            ChartRange::OneMonth,
            ChartInterval::Daily,
        )
    }

    #[test]
    fn test_build_chart_url() {
        let url = YahooProvider::build_chart_url(
            &Symbol::new("msft"),
            ChartRange::SixMonths,
            ChartInterval::Weekly,
        );
        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/MSFT?range=6mo&interval=1wk"
        );
    }

    #[test]
    fn test_quote_from_meta() {
        let data = parse(CHART).unwrap();
        let quote = &data.quote;
        assert_eq!(quote.ticker, "AAPL");
        assert_eq!(quote.name, "Apple Inc.");
        assert_relative_eq!(quote.change, 10.0);
        assert_relative_eq!(quote.change_percent, 5.0);
        assert_relative_eq!(quote.fifty_two_week_high, 220.5);
        assert_eq!(quote.avg_volume, 2000);
        assert!(quote.market_cap.is_none());
    }

    #[test]
    fn test_history_skips_null_close() {
        let data = parse(CHART).unwrap();
        assert_eq!(data.history.len(), 3);
        assert_eq!(data.history[0].date, NaiveDate::from_ymd_opt(2024, 5, 30).unwrap());
        assert_relative_eq!(data.history[2].close, 195.0);
        assert_eq!(data.range, ChartRange::OneMonth);
    }

    #[test]
    fn test_zero_previous_close() {
        let json = r#"{"chart": {"result": [{"meta": {"regularMarketPrice": 5.0},
            "indicators": {"quote": []}}], "error": null}}"#;
        let data = parse(json).unwrap();
        assert_eq!(data.quote.change_percent, 0.0);
        assert_eq!(data.quote.name, "AAPL");
        assert!(data.history.is_empty());
        assert_eq!(data.quote.avg_volume, 0);
    }

    #[test]
    fn test_api_not_found() {
        let json = r#"{"chart": {"result": null, "error": {
            "code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        assert!(parse(json).unwrap_err().is_not_found());
    }

    #[test]
    fn test_provider_info() {
        let provider = YahooProvider::new().unwrap();
        assert_eq!(provider.name(), "Yahoo Finance");
        assert!(!provider.description().is_empty());
    }
}
