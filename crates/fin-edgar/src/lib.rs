#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR data provider for company fundamentals and filings.
//!
//! This crate provides access to SEC EDGAR including:
//!
//! - CIK (Central Index Key) lookup from ticker symbols
//! - Company info and recent filings from the submissions API
//! - XBRL company facts and logical metric extraction
//! - Derived metrics (EBITDA, revenue growth, margins)
//! - Filing document text
//! - Industry peers by SIC code
//!
//! # Example
//!
//! ```no_run
//! use fin_edgar::EdgarProvider;
//! use fin_core::{FundamentalDataProvider, Metric, PeriodType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = EdgarProvider::new("MyApp/1.0 (contact@example.com)")?;
//!
//!     let financials = provider
//!         .financials("AAPL", &[Metric::Revenue, Metric::NetIncome], PeriodType::Annual, 5)
//!         .await?;
//!     println!("Company: {} (CIK: {})", financials.company.name, financials.company.cik);
//!     for point in &financials.metrics[0].points {
//!         println!("{} - Revenue: {}", point.period, point.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use fin_core::{
    Cik, CompanyFinancials, CompanyInfo, DataProvider, FilingDataProvider, FilingDocument,
    FilingForm, FilingInfo, FinError, FundamentalDataProvider, Metric, MetricSeries, PeriodType,
    Result,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Rate-limited HTTP transport.
pub mod client;
/// Derived metric engine.
pub mod derived;
/// Submissions, filing lists and markup stripping.
pub mod filings;
/// Full-text search hits for peer discovery.
pub mod peers;
/// Ticker to CIK resolution.
pub mod resolver;
/// XBRL company facts and metric extraction.
pub mod xbrl;

pub use client::{DEFAULT_RATE, DEFAULT_TIMEOUT, EdgarClient};
pub use peers::PeerSource;
pub use resolver::{CikResolver, DirectorySource, TickerDirectory, TickerEntry};

use client::EDGAR_BASE_URL;
use filings::{MAX_FILING_TEXT_CHARS, MarkupStripper, Submissions};
use xbrl::CompanyFacts;

/// SEC EDGAR data provider.
///
/// Provides company information, XBRL metrics, filings and industry peers.
/// Every request, including the one-time ticker directory load, goes through a
/// single rate limiter (10 requests/second by default).
#[derive(Debug)]
pub struct EdgarProvider {
    client: Arc<EdgarClient>,
    resolver: CikResolver,
    peers: Arc<dyn PeerSource>,
    stripper: MarkupStripper,
}

impl EdgarProvider {
    /// Create a new EDGAR provider with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_client(EdgarClient::new(user_agent)?)
    }

    /// Create a provider with an explicit rate (requests/second) and timeout.
    pub fn with_options(user_agent: &str, rate: f64, timeout: Duration) -> Result<Self> {
        Self::with_client(EdgarClient::with_options(user_agent, rate, timeout)?)
    }

    /// Create a provider around an existing [`EdgarClient`].
    pub fn with_client(client: EdgarClient) -> Result<Self> {
        let client = Arc::new(client);
        Ok(Self {
            resolver: CikResolver::new(client.clone()),
            peers: client.clone(),
            client,
            stripper: MarkupStripper::new()?,
        })
    }

    /// Replaces the source of the ticker directory.
    #[must_use]
    pub fn with_directory_source(mut self, source: Arc<dyn DirectorySource>) -> Self {
        self.resolver = CikResolver::new(source);
        self
    }

    /// Replaces the source of peer candidates and their submissions.
    #[must_use]
    pub fn with_peer_source(mut self, source: Arc<dyn PeerSource>) -> Self {
        self.peers = source;
        self
    }

    /// Resolves a ticker or numeric CIK string.
    pub async fn resolve_cik(&self, identifier: &str) -> Result<Cik> {
        self.resolver.resolve(identifier).await
    }

    /// Fetch company submissions/filings metadata.
    pub async fn submissions(&self, cik: Cik) -> Result<Submissions> {
        self.client
            .get_json(&peers::submissions_url(cik), &format!("submissions for CIK {cik}"))
            .await
    }

    /// Fetch company facts from SEC EDGAR.
    pub async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        let url = format!("{EDGAR_BASE_URL}/api/xbrl/companyfacts/CIK{}.json", cik.padded());
        self.client
            .get_json(&url, &format!("XBRL company facts for CIK {cik}"))
            .await
    }

    async fn lookup(&self, identifier: &str) -> Result<(CompanyInfo, Submissions)> {
        let cik = self.resolve_cik(identifier).await?;
        let submissions = self.submissions(cik).await?;
        let info = submissions.company_info(cik, identifier.trim());
        Ok((info, submissions))
    }

    /// Company info for `cik` if it is classified under `sic`. Lookup failures
    /// count as a non-match.
    async fn peer_with_sic(&self, cik: Cik, fallback_ticker: &str, sic: &str) -> Option<CompanyInfo> {
        match self.peers.submissions(cik).await {
            Ok(submissions) => {
                let info = submissions.company_info(cik, fallback_ticker);
                (info.sic == sic).then_some(info)
            }
            Err(e) => {
                debug!(%cik, error = %e, "Skipping peer candidate");
                None
            }
        }
    }
}

impl DataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR company filings, XBRL financial data and industry classification"
    }
}

#[async_trait]
impl FundamentalDataProvider for EdgarProvider {
    async fn company_info(&self, identifier: &str) -> Result<CompanyInfo> {
        let (info, _) = self.lookup(identifier).await?;
        Ok(info)
    }

    async fn financials(
        &self,
        identifier: &str,
        metrics: &[Metric],
        period_type: PeriodType,
        limit: usize,
    ) -> Result<CompanyFinancials> {
        let (company, _) = self.lookup(identifier).await?;
        let facts = self.company_facts(company.cik).await?;

        let extracted: Vec<MetricSeries> = metrics
            .iter()
            .filter(|m| !m.is_derived_only())
            .map(|&m| xbrl::extract_metric(&facts, m, period_type, limit))
            .collect();
        let derived = derived::derive_all(&facts, metrics, &extracted, period_type, limit);

        debug!(
            ticker = %company.ticker,
            metrics = extracted.len(),
            derived = derived.len(),
            "Extracted financials"
        );

        Ok(CompanyFinancials {
            company,
            period_type,
            metrics: extracted,
            derived,
        })
    }

    /// Seeds candidates from full-text search, then scans the ticker directory
    /// until `limit` matches are found.
    ///
    /// The scan issues one submissions request per directory entry and is
    /// O(directory size) in the worst case.
    async fn companies_by_sic(&self, sic: &str, limit: usize) -> Result<Vec<CompanyInfo>> {
        let sic = sic.trim();
        if sic.is_empty() {
            return Err(FinError::InvalidArgument("empty SIC code".to_string()));
        }

        let mut found = Vec::new();
        let mut seen = HashSet::new();

        match self.peers.search(sic).await {
            Ok(ciks) => {
                for cik in ciks {
                    if found.len() >= limit {
                        break;
                    }
                    if !seen.insert(cik) {
                        continue;
                    }
                    if let Some(info) = self.peer_with_sic(cik, &cik.to_string(), sic).await {
                        found.push(info);
                    }
                }
            }
            Err(e) => warn!(sic, error = %e, "Full-text search failed, using directory scan"),
        }

        if found.len() < limit {
            let directory = self.resolver.directory().await?;
            info!(
                sic,
                found = found.len(),
                entries = directory.len(),
                "Scanning ticker directory for SIC peers"
            );
            for entry in directory.entries() {
                if found.len() >= limit {
                    break;
                }
                if !seen.insert(entry.cik) {
                    continue;
                }
                if let Some(info) = self.peer_with_sic(entry.cik, &entry.ticker, sic).await {
                    found.push(info);
                }
            }
        }

        debug!(sic, peers = found.len(), "Found SIC peers");
        Ok(found)
    }
}

#[async_trait]
impl FilingDataProvider for EdgarProvider {
    async fn filings(
        &self,
        identifier: &str,
        form: FilingForm,
        limit: usize,
    ) -> Result<(CompanyInfo, Vec<FilingInfo>)> {
        let (info, submissions) = self.lookup(identifier).await?;
        let filings = submissions.recent_filings(form, limit);
        debug!(ticker = %info.ticker, %form, count = filings.len(), "Listed filings");
        Ok((info, filings))
    }

    async fn filing_text(
        &self,
        company: &CompanyInfo,
        filing: &FilingInfo,
    ) -> Result<FilingDocument> {
        let url = filings::document_url(company.cik, filing)?;
        let html = self
            .client
            .get_text(&url, &format!("filing {}", filing.accession_number))
            .await?;
        let (text, truncated) =
            filings::truncate_chars(self.stripper.strip(&html), MAX_FILING_TEXT_CHARS);
        Ok(FilingDocument {
            filing: filing.clone(),
            text,
            truncated,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct StaticDirectory {
        entries: Vec<TickerEntry>,
        fetches: AtomicUsize,
    }

    impl StaticDirectory {
        fn new(entries: &[(u64, &str)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|&(cik, ticker)| TickerEntry {
                        cik: Cik::new(cik),
                        ticker: ticker.into(),
                        title: format!("{ticker} Corp"),
                    })
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DirectorySource for StaticDirectory {
        async fn fetch_directory(&self) -> Result<TickerDirectory> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(TickerDirectory::new(self.entries.clone()))
        }
    }

    /// Search hits plus a SIC code per CIK. CIKs without a code fail.
    #[derive(Debug, Default)]
    struct StaticPeers {
        hits: Option<Vec<u64>>,
        sic_by_cik: HashMap<u64, &'static str>,
        requested: Mutex<Vec<u64>>,
    }

    impl StaticPeers {
        fn new(hits: Option<Vec<u64>>, sic_by_cik: &[(u64, &'static str)]) -> Self {
            Self {
                hits,
                sic_by_cik: sic_by_cik.iter().copied().collect(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u64> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PeerSource for StaticPeers {
        async fn search(&self, _sic: &str) -> Result<Vec<Cik>> {
            self.hits
                .as_ref()
                .map(|hits| hits.iter().copied().map(Cik::new).collect())
                .ok_or_else(|| FinError::upstream("SEC EDGAR", "HTTP 500"))
        }

        async fn submissions(&self, cik: Cik) -> Result<Submissions> {
            let raw = cik.value();
            self.requested.lock().unwrap().push(raw);
            let sic = self
                .sic_by_cik
                .get(&raw)
                .ok_or_else(|| FinError::upstream("SEC EDGAR", "HTTP 503"))?;
            Ok(Submissions {
                name: Some(format!("Company {raw}")),
                tickers: vec![Some(format!("T{raw}"))],
                sic: Some((*sic).to_string()),
                sic_description: Some("Services-Prepackaged Software".into()),
                ..Default::default()
            })
        }
    }

    fn provider() -> EdgarProvider {
        EdgarProvider::new("Test/1.0 (test@example.com)").unwrap()
    }

    fn peer_provider(directory: Arc<StaticDirectory>, peers: Arc<StaticPeers>) -> EdgarProvider {
        provider()
            .with_directory_source(directory)
            .with_peer_source(peers)
    }

    fn ciks(found: &[CompanyInfo]) -> Vec<Cik> {
        found.iter().map(|c| c.cik).collect()
    }

    #[test]
    fn test_provider_traits() {
        let provider = provider();
        assert_eq!(provider.name(), "SEC EDGAR");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_blank_user_agent() {
        assert!(EdgarProvider::new("").is_err());
    }

    #[tokio::test]
    async fn test_resolve_with_injected_directory() {
        let provider =
            provider().with_directory_source(Arc::new(StaticDirectory::new(&[(320_193, "AAPL")])));
        assert_eq!(provider.resolve_cik("aapl").await.unwrap(), Cik::new(320_193));
        assert!(provider.resolve_cik("MSFT").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_empty_sic_rejected() {
        let err = provider().companies_by_sic("  ", 5).await.unwrap_err();
        assert!(matches!(err, FinError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_sic_peers_from_search_then_directory() {
        // 2 is in another industry, 5 fails, 3 appears in both sources.
        let peers = Arc::new(StaticPeers::new(
            Some(vec![1, 2, 1, 3]),
            &[(1, "7372"), (2, "3571"), (3, "7372"), (4, "7372"), (6, "7372"), (7, "7372")],
        ));
        let directory = Arc::new(StaticDirectory::new(&[
            (3, "CCC"),
            (4, "DDD"),
            (5, "EEE"),
            (6, "FFF"),
            (7, "GGG"),
        ]));
        let provider = peer_provider(directory.clone(), peers.clone());

        let found = provider.companies_by_sic("7372", 4).await.unwrap();
        assert_eq!(ciks(&found), vec![Cik::new(1), Cik::new(3), Cik::new(4), Cik::new(6)]);
        assert!(found.iter().all(|c| c.sic == "7372"));
        assert_eq!(found[0].ticker, "T1");

        // Each candidate is looked up once and the scan stops at the cap.
        assert_eq!(peers.requested(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(directory.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_search_alone_can_fill_the_cap() {
        let peers = Arc::new(StaticPeers::new(
            Some(vec![1, 3, 4]),
            &[(1, "7372"), (3, "7372"), (4, "7372")],
        ));
        let directory = Arc::new(StaticDirectory::new(&[(9, "III")]));
        let provider = peer_provider(directory.clone(), peers);

        let found = provider.companies_by_sic("7372", 2).await.unwrap();
        assert_eq!(ciks(&found), vec![Cik::new(1), Cik::new(3)]);
        assert_eq!(directory.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_search_falls_back_to_directory_scan() {
        let peers = Arc::new(StaticPeers::new(None, &[(4, "7372"), (6, "2834"), (7, "7372")]));
        let directory = Arc::new(StaticDirectory::new(&[(4, "DDD"), (6, "FFF"), (7, "GGG")]));
        let provider = peer_provider(directory, peers);

        let found = provider.companies_by_sic("7372", 15).await.unwrap();
        assert_eq!(ciks(&found), vec![Cik::new(4), Cik::new(7)]);
        assert_eq!(found[1].ticker, "T7");
    }
}
