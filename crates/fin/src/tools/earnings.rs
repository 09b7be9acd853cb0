//! Earnings release pipeline.
//!
//! Earnings call transcripts are not published by free APIs. The closest
//! public proxy is an 8-K filed under Item 2.02 (Results of Operations and
//! Financial Condition), which usually carries the quarterly press release.

use std::fmt;

use fin_core::{CompanyInfo, FilingDataProvider, FilingForm, FilingInfo, Result};
use tracing::debug;

use super::filing::{FetchedFiling, fetch_documents, write_document};
use crate::request::EarningsRequest;

/// 8-Ks scanned per requested release.
const SCAN_FACTOR: usize = 5;

/// 8-Ks listed when none is an earnings release.
const FALLBACK_LISTING: usize = 5;

/// Item 2.02 filings with text, or the recent 8-Ks when there are none.
#[derive(Clone, Debug, PartialEq)]
pub struct EarningsReport {
    /// The filer.
    pub company: CompanyInfo,
    /// Earnings releases, newest first.
    pub releases: Vec<FetchedFiling>,
    /// Recent 8-Ks, filled only when `releases` is empty.
    pub other_filings: Vec<FilingInfo>,
}

/// Scans `5 * limit` recent 8-Ks for Item 2.02 and fetches their text.
pub async fn earnings_releases(
    provider: &dyn FilingDataProvider,
    request: &EarningsRequest,
) -> Result<EarningsReport> {
    request.validate()?;
    let (company, filings) = provider
        .filings(&request.identifier, FilingForm::EightK, request.limit * SCAN_FACTOR)
        .await?;

    let (releases, others): (Vec<FilingInfo>, Vec<FilingInfo>) =
        filings.into_iter().partition(FilingInfo::is_earnings_release);
    debug!(
        ticker = %company.ticker,
        scanned = releases.len() + others.len(),
        releases = releases.len(),
        "Filtered 8-K filings for Item 2.02"
    );

    if releases.is_empty() {
        return Ok(EarningsReport {
            company,
            releases: Vec::new(),
            other_filings: others.into_iter().take(FALLBACK_LISTING).collect(),
        });
    }

    let releases = releases.into_iter().take(request.limit).collect();
    let releases = fetch_documents(provider, &company, releases).await;
    Ok(EarningsReport {
        company,
        releases,
        other_filings: Vec::new(),
    })
}

impl fmt::Display for EarningsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} ({}) — Earnings Releases (8-K Item 2.02)",
            self.company.name, self.company.ticker
        )?;
        writeln!(f)?;

        if self.releases.is_empty() {
            writeln!(f, "*No earnings-related 8-K filings (Item 2.02) found.*")?;
            writeln!(f)?;
            writeln!(
                f,
                "**Note:** True earnings call transcripts are not available via free public APIs. \
                 SEC 8-K filings with Item 2.02 (Results of Operations and Financial Condition) \
                 are the closest publicly available proxy, typically containing the press release \
                 announcing quarterly results."
            )?;
            if !self.other_filings.is_empty() {
                writeln!(f)?;
                writeln!(f, "### Available 8-K Filings")?;
                writeln!(f)?;
                writeln!(f, "| Date | Items | Description |")?;
                writeln!(f, "|------|-------|-------------|")?;
                for filing in &self.other_filings {
                    let items = if filing.items.is_empty() { "N/A" } else { filing.items.as_str() };
                    let description = if filing.primary_doc_description.is_empty() {
                        "—"
                    } else {
                        filing.primary_doc_description.as_str()
                    };
                    writeln!(f, "| {} | {items} | {description} |", filing.filing_date)?;
                }
            }
        } else {
            for FetchedFiling { filing, document } in &self.releases {
                writeln!(f, "### Earnings Release — Filed {}", filing.filing_date)?;
                writeln!(f)?;
                writeln!(f, "| Field | Value |")?;
                writeln!(f, "|-------|-------|")?;
                writeln!(f, "| Accession | {} |", filing.accession_number)?;
                writeln!(f, "| Report Date | {} |", filing.report_date)?;
                writeln!(f, "| Items | {} |", filing.items)?;
                writeln!(f)?;
                write_document(f, document, "")?;
                writeln!(f)?;
                writeln!(f, "---")?;
                writeln!(f)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "*Data source: SEC EDGAR 8-K filings | Item 2.02 filter*")?;
        write!(
            f,
            "*Note: This is a best-effort proxy for earnings transcripts. True call transcripts require paid data providers.*"
        )
    }
}
