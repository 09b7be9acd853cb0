//! In-memory providers for pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use fin_core::{
    Cik, CompanyFinancials, CompanyInfo, DataProvider, FilingDataProvider, FilingDocument,
    FilingForm, FilingInfo, FinError, FundamentalDataProvider, Metric, MetricPoint, MetricSeries,
    PeriodType, Result,
};

fn cik_for(ticker: &str) -> Cik {
    Cik::new(ticker.bytes().fold(0, |acc, b| acc * 31 + u64::from(b)))
}

pub(crate) fn company(ticker: &str, sic: &str) -> CompanyInfo {
    CompanyInfo {
        cik: cik_for(ticker),
        ticker: ticker.to_string(),
        name: format!("{ticker} Inc."),
        sic: sic.to_string(),
        sic_description: "Services-Prepackaged Software".into(),
        exchanges: vec!["Nasdaq".into()],
    }
}

/// One FY2023 point per metric.
pub(crate) fn financials(ticker: &str, values: &[(Metric, f64)]) -> CompanyFinancials {
    let end_date = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
    CompanyFinancials {
        company: company(ticker, "7372"),
        period_type: PeriodType::Annual,
        metrics: values
            .iter()
            .map(|&(metric, value)| MetricSeries {
                metric,
                points: vec![MetricPoint {
                    period: "FY2023".into(),
                    end_date,
                    value,
                    form: "10-K".into(),
                    filed: "2023-11-03".into(),
                }],
            })
            .collect(),
        derived: Vec::new(),
    }
}

pub(crate) fn filing(accession: &str, form: &str, items: &str, document: &str) -> FilingInfo {
    FilingInfo {
        accession_number: accession.to_string(),
        filing_date: "2024-02-01".into(),
        report_date: "2023-12-31".into(),
        form: form.to_string(),
        primary_document: document.to_string(),
        primary_doc_description: String::new(),
        items: items.to_string(),
    }
}

// =============================================================================
// Fundamentals
// =============================================================================

/// Serves fixed financials by ticker or CIK and keeps only requested metrics.
#[derive(Debug, Default)]
pub(crate) struct StaticFundamentals {
    companies: Vec<CompanyFinancials>,
    failing: Vec<String>,
    calls: AtomicUsize,
    last_limit: AtomicUsize,
}

impl StaticFundamentals {
    pub(crate) fn new(companies: Vec<CompanyFinancials>) -> Self {
        Self {
            companies,
            ..Default::default()
        }
    }

    /// Makes financials for `ticker` fail with an upstream error.
    pub(crate) fn failing(mut self, ticker: &str) -> Self {
        self.failing.push(ticker.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }

    fn find(&self, identifier: &str) -> Result<&CompanyFinancials> {
        self.companies
            .iter()
            .find(|c| {
                c.company.ticker.eq_ignore_ascii_case(identifier)
                    || c.company.cik.to_string() == identifier
            })
            .ok_or_else(|| FinError::NotFound(format!("ticker {identifier}")))
    }
}

impl DataProvider for StaticFundamentals {
    fn name(&self) -> &str {
        "Static"
    }

    fn description(&self) -> &str {
        "In-memory fundamentals"
    }
}

#[async_trait]
impl FundamentalDataProvider for StaticFundamentals {
    async fn company_info(&self, identifier: &str) -> Result<CompanyInfo> {
        Ok(self.find(identifier)?.company.clone())
    }

    async fn financials(
        &self,
        identifier: &str,
        metrics: &[Metric],
        period_type: PeriodType,
        limit: usize,
    ) -> Result<CompanyFinancials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_limit.store(limit, Ordering::SeqCst);

        let stored = self.find(identifier)?;
        if self.failing.contains(&stored.company.ticker) {
            return Err(FinError::upstream("Static", "HTTP 500"));
        }
        Ok(CompanyFinancials {
            company: stored.company.clone(),
            period_type,
            metrics: metrics
                .iter()
                .filter(|m| !m.is_derived_only())
                .map(|&m| {
                    stored
                        .metric(m)
                        .cloned()
                        .unwrap_or_else(|| MetricSeries::empty(m))
                })
                .collect(),
            derived: stored.derived.clone(),
        })
    }

    async fn companies_by_sic(&self, sic: &str, limit: usize) -> Result<Vec<CompanyInfo>> {
        Ok(self
            .companies
            .iter()
            .filter(|c| c.company.sic == sic)
            .take(limit)
            .map(|c| c.company.clone())
            .collect())
    }
}

// =============================================================================
// Filings
// =============================================================================

/// Serves a fixed filing list for Apple. Documents named `broken.htm` fail.
#[derive(Debug, Default)]
pub(crate) struct StaticFilings {
    filings: Vec<FilingInfo>,
    last_limit: AtomicUsize,
}

impl StaticFilings {
    pub(crate) fn new(filings: Vec<FilingInfo>) -> Self {
        Self {
            filings,
            ..Default::default()
        }
    }

    pub(crate) fn last_limit(&self) -> usize {
        self.last_limit.load(Ordering::SeqCst)
    }
}

impl DataProvider for StaticFilings {
    fn name(&self) -> &str {
        "Static"
    }

    fn description(&self) -> &str {
        "In-memory filings"
    }
}

#[async_trait]
impl FilingDataProvider for StaticFilings {
    async fn filings(
        &self,
        _identifier: &str,
        form: FilingForm,
        limit: usize,
    ) -> Result<(CompanyInfo, Vec<FilingInfo>)> {
        self.last_limit.store(limit, Ordering::SeqCst);
        let company = CompanyInfo {
            cik: Cik::new(320_193),
            ticker: "AAPL".into(),
            name: "Apple Inc.".into(),
            sic: "3571".into(),
            sic_description: "Electronic Computers".into(),
            exchanges: vec!["Nasdaq".into()],
        };
        let filings = self
            .filings
            .iter()
            .filter(|f| f.form == form.as_str())
            .take(limit)
            .cloned()
            .collect();
        Ok((company, filings))
    }

    async fn filing_text(
        &self,
        _company: &CompanyInfo,
        filing: &FilingInfo,
    ) -> Result<FilingDocument> {
        if filing.primary_document == "broken.htm" {
            return Err(FinError::upstream("Static", "HTTP 503"));
        }
        Ok(FilingDocument {
            filing: filing.clone(),
            text: format!("Text of {}", filing.primary_document),
            truncated: false,
        })
    }
}
