#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! FRED (Federal Reserve Economic Data) provider.
//!
//! This crate implements the fin-core macro traits for the
//! [FRED](https://fred.stlouisfed.org/docs/api/fred/) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fin_fred::FredProvider;
//! use fin_core::{MacroDataProvider, ObservationQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FredProvider::new(std::env::var("FRED_API_KEY").ok())?;
//!
//!     let data = provider.indicator("UNRATE", &ObservationQuery::default()).await?;
//!     println!("{}: {} observations", data.series.title, data.observations.len());
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use fin_core::{
    DataProvider, FinError, MacroDataProvider, Observation, ObservationQuery, RateLimiter, Result,
    SeriesInfo,
};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Base URL for the FRED API.
const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Provider name used in errors and logs.
const PROVIDER: &str = "FRED";

/// Environment variable carrying the API key.
pub const API_KEY_VAR: &str = "FRED_API_KEY";

/// Default rate limit: 2 requests per second.
pub const DEFAULT_RATE: f64 = 2.0;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Frequently used series: `(alias, series id)`.
pub const COMMON_SERIES: [(&str, &str); 12] = [
    ("GDP", "GDP"),
    ("REAL_GDP", "GDPC1"),
    ("CPI", "CPIAUCSL"),
    ("CORE_CPI", "CPILFESL"),
    ("FED_FUNDS", "FEDFUNDS"),
    ("UNEMPLOYMENT", "UNRATE"),
    ("10Y_TREASURY", "DGS10"),
    ("2Y_TREASURY", "DGS2"),
    ("SP500", "SP500"),
    ("VIX", "VIXCLS"),
    ("HOUSING_STARTS", "HOUST"),
    ("INDUSTRIAL_PRODUCTION", "INDPRO"),
];

/// Maps a common alias (e.g. `UNEMPLOYMENT`) to its series id; other input is
/// returned trimmed and uppercased.
#[must_use]
pub fn series_id(input: &str) -> String {
    let wanted = input.trim().to_uppercase();
    COMMON_SERIES
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map_or(wanted, |(_, id)| (*id).to_string())
}

/// FRED data provider.
///
/// The API key is optional at construction; every request without one fails
/// with [`FinError::MissingCredential`].
#[derive(Clone)]
pub struct FredProvider {
    client: Client,
    api_key: Option<String>,
    limiter: Arc<RateLimiter>,
}

impl fmt::Debug for FredProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FredProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl FredProvider {
    /// Create a new FRED provider with the default rate and timeout.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_RATE, DEFAULT_TIMEOUT)
    }

    /// Create a provider with an explicit rate (requests/second) and timeout.
    pub fn with_options(api_key: Option<String>, rate: f64, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FinError::upstream(PROVIDER, format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, api_key, rate))
    }

    /// Create a new FRED provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, api_key: Option<String>, rate: f64) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            limiter: Arc::new(RateLimiter::per_second(rate)),
        }
    }

    /// True when an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| FinError::missing_credential(PROVIDER, API_KEY_VAR))
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        series_id: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let api_key = self.api_key()?;
        self.limiter.acquire().await;

        debug!(endpoint, series_id, "FRED request");
        let response = self
            .client
            .get(format!("{FRED_BASE_URL}/{endpoint}"))
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key),
                ("file_type", "json"),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| FinError::upstream(PROVIDER, e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FinError::upstream(PROVIDER, e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(api_error(status, &text, series_id));
        }

        serde_json::from_str(&text)
            .map_err(|e| FinError::upstream(PROVIDER, format!("failed to parse {endpoint}: {e}")))
    }
}

/// Maps a FRED error response onto the error taxonomy.
fn api_error(status: reqwest::StatusCode, body: &str, series_id: &str) -> FinError {
    let message = serde_json::from_str::<FredErrorBody>(body)
        .map(|b| b.error_message)
        .unwrap_or_else(|_| format!("HTTP {status}"));
    if status == reqwest::StatusCode::NOT_FOUND || message.contains("does not exist") {
        FinError::NotFound(format!("FRED series \"{series_id}\""))
    } else {
        FinError::upstream(PROVIDER, message)
    }
}

impl DataProvider for FredProvider {
    fn name(&self) -> &str {
        "FRED"
    }

    fn description(&self) -> &str {
        "Federal Reserve Economic Data: macroeconomic time series"
    }
}

#[async_trait]
impl MacroDataProvider for FredProvider {
    async fn series_info(&self, series_id: &str) -> Result<SeriesInfo> {
        let response: FredSeriesResponse = self.get("series", series_id, &[]).await?;
        response
            .seriess
            .into_iter()
            .next()
            .map(FredSeries::into_info)
            .ok_or_else(|| FinError::NotFound(format!("FRED series \"{series_id}\"")))
    }

    async fn observations(
        &self,
        series_id: &str,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>> {
        let mut params = vec![
            ("sort_order", "desc".to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(start) = &query.start_date {
            params.push(("observation_start", start.clone()));
        }
        if let Some(end) = &query.end_date {
            params.push(("observation_end", end.clone()));
        }

        let response: FredObservationsResponse =
            self.get("series/observations", series_id, &params).await?;
        Ok(response
            .observations
            .into_iter()
            .map(FredObservation::into_observation)
            .collect())
    }
}

// =============================================================================
// FRED API Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct FredErrorBody {
    error_message: String,
}

#[derive(Debug, Deserialize)]
struct FredSeriesResponse {
    #[serde(default)]
    seriess: Vec<FredSeries>,
}

#[derive(Debug, Deserialize)]
struct FredSeries {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    units: String,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    seasonal_adjustment: String,
    #[serde(default)]
    last_updated: String,
    #[serde(default)]
    notes: Option<String>,
}

impl FredSeries {
    fn into_info(self) -> SeriesInfo {
        SeriesInfo {
            id: self.id,
            title: self.title,
            units: self.units,
            frequency: self.frequency,
            seasonal_adjustment: self.seasonal_adjustment,
            last_updated: self.last_updated,
            notes: self.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FredObservationsResponse {
    #[serde(default)]
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

impl FredObservation {
    /// FRED reports missing values as `"."`.
    fn into_observation(self) -> Observation {
        let value = match self.value.trim() {
            "." => None,
            v => v.parse().ok(),
        };
        Observation {
            date: self.date,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_metadata() {
        let provider = FredProvider::new(Some("test_key".into())).unwrap();
        assert_eq!(provider.name(), "FRED");
        assert!(!provider.description().is_empty());
        assert!(provider.has_api_key());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = FredProvider::new(Some("secret_key_12345".into())).unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_call_time() {
        let provider = FredProvider::new(Some("  ".into())).unwrap();
        assert!(!provider.has_api_key());

        let err = provider.series_info("GDP").await.unwrap_err();
        assert_eq!(err, FinError::missing_credential("FRED", "FRED_API_KEY"));

        let err = provider
            .observations("GDP", &ObservationQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FinError::MissingCredential { .. }));
    }

    #[test]
    fn test_series_alias() {
        assert_eq!(series_id("unemployment"), "UNRATE");
        assert_eq!(series_id(" 10y_treasury "), "DGS10");
        assert_eq!(series_id("t10y2y"), "T10Y2Y");
    }

    #[test]
    fn test_parse_series() {
        let json = r#"{"realtime_start": "2024-06-10", "seriess": [{
            "id": "UNRATE", "title": "Unemployment Rate", "units": "Percent",
            "frequency": "Monthly", "seasonal_adjustment": "Seasonally Adjusted",
            "last_updated": "2024-06-07 07:46:02-05", "notes": null
        }]}"#;
        let response: FredSeriesResponse = serde_json::from_str(json).unwrap();
        let info = response.seriess.into_iter().next().unwrap().into_info();
        assert_eq!(info.id, "UNRATE");
        assert_eq!(info.units, "Percent");
        assert!(info.notes.is_empty());
    }

    #[test]
    fn test_parse_observations_missing_values() {
        let json = r#"{"count": 3, "observations": [
            {"realtime_start": "2024-06-10", "date": "2024-05-01", "value": "4.0"},
            {"realtime_start": "2024-06-10", "date": "2024-04-01", "value": "."},
            {"realtime_start": "2024-06-10", "date": "2024-03-01", "value": "3.8"}
        ]}"#;
        let response: FredObservationsResponse = serde_json::from_str(json).unwrap();
        let values: Vec<_> = response
            .observations
            .into_iter()
            .map(|o| o.into_observation().value)
            .collect();
        assert_eq!(values, vec![Some(4.0), None, Some(3.8)]);
    }

    #[test]
    fn test_api_error_mapping() {
        let body = r#"{"error_code": 400, "error_message": "Bad Request.  The series does not exist."}"#;
        let err = api_error(reqwest::StatusCode::BAD_REQUEST, body, "NOPE");
        assert!(err.is_not_found());

        let err = api_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "oops", "GDP");
        assert_eq!(err, FinError::upstream("FRED", "HTTP 500 Internal Server Error"));
    }
}
