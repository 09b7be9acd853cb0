//! Full-text search hits used to seed SIC peer discovery.

use async_trait::async_trait;
use fin_core::{Cik, Result};
use serde::Deserialize;
use std::fmt::Debug;

use crate::client::{EDGAR_BASE_URL, EFTS_URL, EdgarClient};
use crate::filings::Submissions;

/// Full-text search query for 10-K filers mentioning `sic`.
#[must_use]
pub fn search_url(sic: &str) -> String {
    format!("{EFTS_URL}?q=%22{sic}%22&dateRange=custom&startdt=2024-01-01&forms=10-K")
}

/// Response from the SEC full-text search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    hits: SearchHits,
}

#[derive(Debug, Default, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source", default)]
    source: HitSource,
}

#[derive(Debug, Default, Deserialize)]
struct HitSource {
    #[serde(default)]
    ciks: Vec<String>,
}

impl SearchResponse {
    /// Distinct filer CIKs in hit order.
    #[must_use]
    pub fn ciks(&self) -> Vec<Cik> {
        let mut ciks: Vec<Cik> = Vec::new();
        for cik in self
            .hits
            .hits
            .iter()
            .flat_map(|hit| &hit.source.ciks)
            .filter_map(|raw| raw.parse::<Cik>().ok())
        {
            if !ciks.contains(&cik) {
                ciks.push(cik);
            }
        }
        ciks
    }
}

/// Submissions document URL for `cik`.
#[must_use]
pub fn submissions_url(cik: Cik) -> String {
    format!("{EDGAR_BASE_URL}/submissions/CIK{}.json", cik.padded())
}

/// Candidate search and classification lookups behind SIC peer discovery.
#[async_trait]
pub trait PeerSource: Send + Sync + Debug {
    /// Filer CIKs from a full-text search for `sic`, in hit order.
    async fn search(&self, sic: &str) -> Result<Vec<Cik>>;

    /// Submissions document for `cik`.
    async fn submissions(&self, cik: Cik) -> Result<Submissions>;
}

#[async_trait]
impl PeerSource for EdgarClient {
    async fn search(&self, sic: &str) -> Result<Vec<Cik>> {
        let response: SearchResponse = self.get_json(&search_url(sic), "full-text search").await?;
        Ok(response.ciks())
    }

    async fn submissions(&self, cik: Cik) -> Result<Submissions> {
        self.get_json(&submissions_url(cik), &format!("submissions for CIK {cik}"))
            .await
    }
}
