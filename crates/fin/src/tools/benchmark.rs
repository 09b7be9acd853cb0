//! Industry benchmark statistics over SIC peers.

use std::fmt;

use fin_core::{
    Batch, BenchmarkSummary, CompanyFinancials, CompanyInfo, DerivedMetric, FinError,
    FundamentalDataProvider, Metric, PeriodType, Result, summarize,
};
use futures::future::join_all;
use tracing::{debug, info};

use crate::format;
use crate::request::{BenchmarkRequest, IndustrySelector, MAX_INDUSTRY_PEERS};

/// Summary statistics per metric over an industry's peers.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkReport {
    /// SIC code benchmarked.
    pub sic: String,
    /// SIC description, empty when the code was given directly.
    pub sic_description: String,
    /// Peers discovered for the SIC code.
    pub peers: Vec<CompanyInfo>,
    /// Number of peers whose financials were retrieved.
    pub peers_with_data: usize,
    /// Statistics per extracted metric, in request order.
    pub metrics: Vec<(Metric, BenchmarkSummary)>,
    /// Statistics per derived metric present for any peer.
    pub derived: Vec<(DerivedMetric, BenchmarkSummary)>,
    /// One line per peer whose financials could not be retrieved.
    pub warnings: Vec<String>,
}

fn peer_label(peer: &CompanyInfo) -> &str {
    if peer.ticker.is_empty() {
        peer.name.as_str()
    } else {
        peer.ticker.as_str()
    }
}

async fn resolve_industry(
    provider: &dyn FundamentalDataProvider,
    industry: &IndustrySelector,
) -> Result<(String, String)> {
    match industry {
        IndustrySelector::Sic(sic) => Ok((sic.clone(), String::new())),
        IndustrySelector::Ticker(ticker) => {
            let info = provider.company_info(ticker).await?;
            if info.sic.is_empty() {
                return Err(FinError::NotFound(format!("SIC code for {ticker}")));
            }
            Ok((info.sic, info.sic_description))
        }
    }
}

/// Discovers up to 15 peers and summarizes their latest annual values.
///
/// Peers whose financials fail are left out; a peer lacking one metric is
/// left out of that metric's statistics only.
pub async fn industry_benchmarks(
    provider: &dyn FundamentalDataProvider,
    request: &BenchmarkRequest,
) -> Result<BenchmarkReport> {
    request.validate()?;
    let (sic, sic_description) = resolve_industry(provider, &request.industry).await?;

    let peers = provider.companies_by_sic(&sic, MAX_INDUSTRY_PEERS).await?;
    if peers.is_empty() {
        return Err(FinError::NotFound(format!("peer companies for SIC {sic}")));
    }
    info!(sic = %sic, peers = peers.len(), "Benchmarking industry peers");

    let results = join_all(peers.iter().map(|peer| async move {
        let result = provider
            .financials(&peer.cik.to_string(), &request.metrics, PeriodType::Annual, 1)
            .await;
        (peer_label(peer).to_string(), result)
    }))
    .await;
    let batch = Batch::from_results(results);

    for (peer, error) in batch.failures() {
        debug!(peer, error = %error, "Peer skipped");
    }
    if batch.is_total_failure() {
        return Err(FinError::NotFound(format!(
            "financial data for any peer company in SIC {sic}"
        )));
    }
    let warnings = batch.warnings();
    let (ok, _) = batch.into_parts();
    let peer_data: Vec<CompanyFinancials> = ok.into_iter().map(|(_, data)| data).collect();

    let metrics = request
        .metrics
        .iter()
        .filter(|m| !m.is_derived_only())
        .map(|&metric| {
            let values: Vec<f64> = peer_data.iter().filter_map(|p| p.latest(metric)).collect();
            (metric, summarize(&values))
        })
        .collect();

    let mut derived_metrics: Vec<DerivedMetric> = Vec::new();
    for series in peer_data.iter().flat_map(|p| &p.derived) {
        if !derived_metrics.contains(&series.metric) {
            derived_metrics.push(series.metric);
        }
    }
    let derived = derived_metrics
        .into_iter()
        .map(|metric| {
            let values: Vec<f64> = peer_data
                .iter()
                .filter_map(|p| p.derived(metric).and_then(|d| d.latest_value()))
                .collect();
            (metric, summarize(&values))
        })
        .collect();

    Ok(BenchmarkReport {
        sic,
        sic_description,
        peers,
        peers_with_data: peer_data.len(),
        metrics,
        derived,
        warnings,
    })
}

impl BenchmarkReport {
    /// Statistics for `metric`, if it was requested.
    #[must_use]
    pub fn summary(&self, metric: Metric) -> Option<&BenchmarkSummary> {
        self.metrics
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, s)| s)
    }
}

fn stats_row<F>(f: &mut fmt::Formatter<'_>, label: &str, s: &BenchmarkSummary, fmt_value: F) -> fmt::Result
where
    F: Fn(Option<f64>) -> String,
{
    writeln!(
        f,
        "| **{label}** | {} | {} | {} | {} | {} | {} | {} |",
        fmt_value(s.median),
        fmt_value(s.mean),
        fmt_value(s.p25),
        fmt_value(s.p75),
        fmt_value(s.min),
        fmt_value(s.max),
        s.count
    )
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sic_description.is_empty() {
            writeln!(f, "## Industry Benchmarks — SIC {}", self.sic)?;
        } else {
            writeln!(
                f,
                "## Industry Benchmarks — SIC {} ({})",
                self.sic, self.sic_description
            )?;
        }
        writeln!(f)?;

        let labels: Vec<&str> = self.peers.iter().map(peer_label).collect();
        writeln!(f, "**Peer companies found:** {}", self.peers.len())?;
        writeln!(f, "**Peers:** {}", labels.join(", "))?;
        writeln!(f)?;

        writeln!(
            f,
            "### Benchmark Statistics ({} peers with data)",
            self.peers_with_data
        )?;
        writeln!(f)?;
        writeln!(f, "| Metric | Median | Mean | P25 | P75 | Min | Max | N |")?;
        writeln!(f, "|--------|--------|------|-----|-----|-----|-----|---|")?;
        for (metric, summary) in &self.metrics {
            stats_row(f, metric.as_str(), summary, |v| format::metric_value(*metric, v))?;
        }
        for (metric, summary) in &self.derived {
            stats_row(f, metric.as_str(), summary, |v| format::derived_value(*metric, v))?;
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "*Skipped {} peer(s) without data:*", self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(f, "- {warning}")?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "*Data source: SEC EDGAR XBRL | SIC {} | {} peers analyzed*",
            self.sic, self.peers_with_data
        )?;
        write!(
            f,
            "*Note: Benchmarks are based on most recent annual filings from public companies in this SIC code.*"
        )
    }
}
