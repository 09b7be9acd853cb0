//! Ticker to CIK resolution.
//!
//! The SEC publishes one bulk ticker directory. [`CikResolver`] loads it on
//! first use, keeps it for the life of the process and answers every later
//! lookup from memory. Concurrent first callers share a single fetch; a failed
//! fetch leaves the resolver empty so the next call tries again.

use async_trait::async_trait;
use fin_core::{Cik, FinError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::client::{COMPANY_TICKERS_URL, EdgarClient};

/// One row of the SEC ticker directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickerEntry {
    /// Company CIK.
    pub cik: Cik,
    /// Ticker as listed (uppercase).
    pub ticker: String,
    /// Company title.
    pub title: String,
}

/// In-memory ticker directory with case-insensitive lookup.
///
/// Entries keep the source order so scans over the directory are deterministic.
#[derive(Clone, Debug, Default)]
pub struct TickerDirectory {
    entries: Vec<TickerEntry>,
    by_ticker: HashMap<String, usize>,
}

impl TickerDirectory {
    /// Builds a directory. When a ticker repeats, the first entry wins.
    #[must_use]
    pub fn new(entries: Vec<TickerEntry>) -> Self {
        let mut by_ticker = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            by_ticker.entry(entry.ticker.to_uppercase()).or_insert(i);
        }
        Self { entries, by_ticker }
    }

    /// Decodes the `company_tickers.json` payload.
    ///
    /// The payload is an object keyed by row number; rows are ordered by that
    /// number.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, CompanyTickerInfo> = serde_json::from_str(json).map_err(|e| {
            FinError::upstream(
                crate::client::PROVIDER,
                format!("failed to parse company tickers: {e}"),
            )
        })?;
        Ok(Self::from_rows(raw))
    }

    fn from_rows(raw: HashMap<String, CompanyTickerInfo>) -> Self {
        let mut rows: Vec<(u64, CompanyTickerInfo)> = raw
            .into_iter()
            .map(|(key, info)| (key.parse().unwrap_or(u64::MAX), info))
            .collect();
        rows.sort_by_key(|(key, _)| *key);

        Self::new(
            rows.into_iter()
                .map(|(_, info)| TickerEntry {
                    cik: Cik::new(info.cik_str),
                    ticker: info.ticker.to_uppercase(),
                    title: info.title,
                })
                .collect(),
        )
    }

    /// Looks up a ticker, ignoring case.
    #[must_use]
    pub fn get(&self, ticker: &str) -> Option<&TickerEntry> {
        self.by_ticker
            .get(&ticker.trim().to_uppercase())
            .map(|&i| &self.entries[i])
    }

    /// All entries in source order.
    #[must_use]
    pub fn entries(&self) -> &[TickerEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the directory has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer)
    cik_str: u64,
    ticker: String,
    #[serde(default)]
    title: String,
}

/// Source of the bulk ticker directory.
#[async_trait]
pub trait DirectorySource: Send + Sync + Debug {
    /// Fetches the full directory.
    async fn fetch_directory(&self) -> Result<TickerDirectory>;
}

#[async_trait]
impl DirectorySource for EdgarClient {
    async fn fetch_directory(&self) -> Result<TickerDirectory> {
        let raw: HashMap<String, CompanyTickerInfo> =
            self.get_json(COMPANY_TICKERS_URL, "company tickers").await?;
        Ok(TickerDirectory::from_rows(raw))
    }
}

/// Process-lifetime ticker to CIK resolver.
#[derive(Debug)]
pub struct CikResolver {
    source: Arc<dyn DirectorySource>,
    directory: OnceCell<Arc<TickerDirectory>>,
}

impl CikResolver {
    /// Creates a resolver that loads its directory from `source` on first use.
    #[must_use]
    pub fn new(source: Arc<dyn DirectorySource>) -> Self {
        Self {
            source,
            directory: OnceCell::new(),
        }
    }

    /// Returns the directory, loading it if this is the first use.
    pub async fn directory(&self) -> Result<Arc<TickerDirectory>> {
        self.directory
            .get_or_try_init(|| async {
                let directory = self.source.fetch_directory().await?;
                info!(entries = directory.len(), "Loaded SEC ticker directory");
                Ok::<_, FinError>(Arc::new(directory))
            })
            .await
            .cloned()
    }

    /// Resolves a ticker or numeric CIK string to a CIK.
    ///
    /// All-digit identifiers are taken as CIKs without touching the directory.
    pub async fn resolve(&self, identifier: &str) -> Result<Cik> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(FinError::InvalidArgument("empty ticker or CIK".to_string()));
        }
        if Cik::is_numeric_identifier(identifier) {
            return identifier.parse();
        }

        let directory = self.directory().await?;
        let entry = directory.get(identifier).ok_or_else(|| {
            FinError::NotFound(format!("ticker \"{identifier}\" in SEC EDGAR"))
        })?;
        debug!(ticker = identifier, cik = %entry.cik, "Resolved ticker");
        Ok(entry.cik)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TICKERS: &str = r#"{
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"},
        "10": {"cik_str": 1018724, "ticker": "AMZN", "title": "AMAZON COM INC"},
        "2": {"cik_str": 1652044, "ticker": "googl", "title": "Alphabet Inc."}
    }"#;

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl DirectorySource for CountingSource {
        async fn fetch_directory(&self) -> Result<TickerDirectory> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_first && call == 0 {
                return Err(FinError::upstream("SEC EDGAR", "HTTP 503"));
            }
            TickerDirectory::from_json(TICKERS)
        }
    }

    #[test]
    fn test_directory_keeps_row_order() {
        let directory = TickerDirectory::from_json(TICKERS).unwrap();
        let tickers: Vec<_> = directory.entries().iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT", "GOOGL", "AMZN"]);
        assert_eq!(directory.get("googl").unwrap().cik, Cik::new(1_652_044));
    }

    #[tokio::test]
    async fn test_resolve_fetches_directory_once() {
        let source = Arc::new(CountingSource::default());
        let resolver = CikResolver::new(source.clone());

        assert_eq!(resolver.resolve("AAPL").await.unwrap(), Cik::new(320_193));
        assert_eq!(resolver.resolve("aapl").await.unwrap(), Cik::new(320_193));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_use_shares_fetch() {
        let source = Arc::new(CountingSource::default());
        let resolver = CikResolver::new(source.clone());

        let (a, b, c) = tokio::join!(
            resolver.resolve("AAPL"),
            resolver.resolve("MSFT"),
            resolver.resolve("AMZN")
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_numeric_identifier_bypasses_directory() {
        let source = Arc::new(CountingSource::default());
        let resolver = CikResolver::new(source.clone());

        assert_eq!(resolver.resolve("0000320193").await.unwrap(), Cik::new(320_193));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_not_found() {
        let resolver = CikResolver::new(Arc::new(CountingSource::default()));
        let err = resolver.resolve("ZZZZ").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let source = Arc::new(CountingSource {
            fail_first: true,
            ..Default::default()
        });
        let resolver = CikResolver::new(source.clone());

        assert!(resolver.resolve("AAPL").await.is_err());
        assert_eq!(resolver.resolve("AAPL").await.unwrap(), Cik::new(320_193));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
