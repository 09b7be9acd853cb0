//! Rate-limited HTTP transport for the SEC endpoints.

use fin_core::{FinError, RateLimiter, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Provider name used in errors and logs.
pub const PROVIDER: &str = "SEC EDGAR";

/// SEC EDGAR API base URL
pub const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// SEC company tickers URL
pub const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// SEC filing archive base URL
pub const ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// SEC full-text search URL
pub const EFTS_URL: &str = "https://efts.sec.gov/LATEST/search-index";

/// Default rate limit: 10 requests per second (SEC requirement)
pub const DEFAULT_RATE: f64 = 10.0;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for SEC endpoints, gated by one shared [`RateLimiter`].
///
/// The SEC requires an identifying `User-Agent` on every request.
#[derive(Debug)]
pub struct EdgarClient {
    http: reqwest::Client,
    limiter: RateLimiter,
}

impl EdgarClient {
    /// Creates a client with the default rate and timeout.
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_options(user_agent, DEFAULT_RATE, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit rate (requests/second) and timeout.
    pub fn with_options(user_agent: &str, rate: f64, timeout: Duration) -> Result<Self> {
        if user_agent.trim().is_empty() {
            return Err(FinError::InvalidArgument(
                "SEC EDGAR requires a non-empty User-Agent identification".to_string(),
            ));
        }
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FinError::upstream(PROVIDER, format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, rate))
    }

    /// Wraps a pre-configured reqwest client.
    ///
    /// The client must already carry an identifying `User-Agent`.
    #[must_use]
    pub fn with_client(http: reqwest::Client, rate: f64) -> Self {
        Self {
            http,
            limiter: RateLimiter::per_second(rate),
        }
    }

    /// Fetches `url` and decodes the JSON body.
    ///
    /// `subject` names what is being fetched and is used for `NotFound` errors.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, subject: &str) -> Result<T> {
        let response = self.send(url, subject, "application/json").await?;
        response
            .json()
            .await
            .map_err(|e| FinError::upstream(PROVIDER, format!("failed to parse {subject}: {e}")))
    }

    /// Fetches `url` as text.
    pub async fn get_text(&self, url: &str, subject: &str) -> Result<String> {
        let response = self.send(url, subject, "text/html,text/plain,*/*").await?;
        response
            .text()
            .await
            .map_err(|e| FinError::upstream(PROVIDER, format!("failed to read {subject}: {e}")))
    }

    async fn send(&self, url: &str, subject: &str, accept: &str) -> Result<reqwest::Response> {
        self.limiter.acquire().await;

        debug!(url, "Fetching from SEC");
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
            .map_err(|e| FinError::upstream(PROVIDER, e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FinError::NotFound(format!("{subject} in SEC EDGAR")));
        }
        if !status.is_success() {
            return Err(FinError::upstream(
                PROVIDER,
                format!("failed to fetch {subject}: HTTP {status}"),
            ));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_user_agent_rejected() {
        let err = EdgarClient::new("   ").unwrap_err();
        assert!(matches!(err, FinError::InvalidArgument(_)));
    }

    #[test]
    fn test_rate_configures_limiter() {
        let client = EdgarClient::with_client(reqwest::Client::new(), 4.0);
        assert_eq!(client.limiter.interval(), Duration::from_millis(250));
    }
}
