//! Side-by-side company comparison.

use std::fmt;

use fin_core::{
    Batch, CompanyFinancials, DerivedMetric, FinError, FundamentalDataProvider, Metric, PeriodType,
    Result,
};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::format::{self, MISSING};
use crate::request::CompareRequest;

/// Latest-period metrics for several companies with rankings.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    /// Tickers as requested.
    pub tickers: Vec<String>,
    /// Period type compared.
    pub period: PeriodType,
    /// Compared metrics, in row order.
    pub metrics: Vec<Metric>,
    /// Companies that returned data, in request order.
    pub companies: Vec<CompanyFinancials>,
    /// One line per company that failed.
    pub warnings: Vec<String>,
}

/// Fetches the latest period for every ticker concurrently.
///
/// Failed tickers become warnings. Fails only when no ticker succeeds.
pub async fn compare_companies(
    provider: &dyn FundamentalDataProvider,
    request: &CompareRequest,
) -> Result<ComparisonReport> {
    request.validate()?;
    debug!(
        tickers = ?request.tickers,
        metrics = request.metrics.len(),
        provider = provider.name(),
        "Comparing companies"
    );

    let results = join_all(request.tickers.iter().map(|ticker| async move {
        let result = provider
            .financials(ticker, &request.metrics, request.period, 1)
            .await;
        (ticker.clone(), result)
    }))
    .await;
    let batch = Batch::from_results(results);

    for (ticker, error) in batch.failures() {
        warn!(ticker, error = %error, "Comparison lookup failed");
    }
    let warnings = batch.warnings();
    if batch.is_total_failure() {
        return Err(FinError::NotFound(format!(
            "no financial data could be retrieved for any of the specified companies ({})",
            warnings.join("; ")
        )));
    }

    let (companies, _) = batch.into_parts();
    Ok(ComparisonReport {
        tickers: request.tickers.clone(),
        period: request.period,
        metrics: request.metrics.clone(),
        companies: companies.into_iter().map(|(_, c)| c).collect(),
        warnings,
    })
}

impl ComparisonReport {
    /// Latest value of `metric` per company, in column order.
    #[must_use]
    pub fn values(&self, metric: Metric) -> Vec<Option<f64>> {
        self.companies.iter().map(|c| c.latest(metric)).collect()
    }

    /// Rank of each company for `metric`, highest value first.
    ///
    /// Companies without a value are unranked. Equal values keep column order.
    #[must_use]
    pub fn rankings(&self, metric: Metric) -> Vec<Option<usize>> {
        let values = self.values(metric);
        let mut ranked: Vec<(usize, f64)> = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut ranks = vec![None; values.len()];
        for (rank, (column, _)) in ranked.into_iter().enumerate() {
            ranks[column] = Some(rank + 1);
        }
        ranks
    }

    /// Derived metrics present for any company, in first-seen order.
    #[must_use]
    pub fn derived_metrics(&self) -> Vec<DerivedMetric> {
        let mut seen = Vec::new();
        for series in self.companies.iter().flat_map(|c| &c.derived) {
            if !seen.contains(&series.metric) {
                seen.push(series.metric);
            }
        }
        seen
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<&str> = self
            .companies
            .iter()
            .map(|c| c.company.ticker.as_str())
            .collect();
        writeln!(f, "| Metric | {} |", headers.join(" | "))?;
        writeln!(f, "|--------|{}|", vec!["-------"; headers.len()].join("|"))
    }
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, cells: Vec<String>) -> fmt::Result {
    writeln!(f, "| **{label}** | {} |", cells.join(" | "))
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Company Comparison")?;
        writeln!(f)?;
        writeln!(f, "**Companies:** {}", self.tickers.join(", "))?;
        writeln!(f, "**Period:** Most recent {}", self.period)?;
        writeln!(f)?;

        if !self.warnings.is_empty() {
            writeln!(f, "### Warnings")?;
            for warning in &self.warnings {
                match warning.split_once(": ") {
                    Some((ticker, message)) => writeln!(f, "- **{ticker}**: {message}")?,
                    None => writeln!(f, "- {warning}")?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "### Financial Comparison")?;
        writeln!(f)?;
        self.write_header(f)?;
        row(
            f,
            "Name",
            self.companies.iter().map(|c| format::cell(&c.company.name)).collect(),
        )?;
        row(
            f,
            "SIC",
            self.companies.iter().map(|c| c.company.sic.clone()).collect(),
        )?;
        for &metric in &self.metrics {
            if metric.is_derived_only() {
                continue;
            }
            let cells = self
                .values(metric)
                .into_iter()
                .map(|v| format::metric_value(metric, v))
                .collect();
            row(f, metric.as_str(), cells)?;
        }
        for derived in self.derived_metrics() {
            let cells = self
                .companies
                .iter()
                .map(|c| {
                    format::derived_value(derived, c.derived(derived).and_then(|d| d.latest_value()))
                })
                .collect();
            row(f, derived.as_str(), cells)?;
        }

        writeln!(f)?;
        writeln!(f, "### Rankings (highest value = rank 1)")?;
        writeln!(f)?;
        self.write_header(f)?;
        for &metric in &self.metrics {
            if metric.is_derived_only() {
                continue;
            }
            let cells = self
                .rankings(metric)
                .into_iter()
                .map(|r| r.map_or_else(|| MISSING.to_string(), |r| format!("#{r}")))
                .collect();
            row(f, metric.as_str(), cells)?;
        }

        writeln!(f)?;
        write!(
            f,
            "*Data source: SEC EDGAR XBRL | {} companies compared*",
            self.companies.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StaticFundamentals, financials};

    fn provider() -> StaticFundamentals {
        StaticFundamentals::new(vec![
            financials(
                "AAPL",
                &[(Metric::Revenue, 383e9), (Metric::NetIncome, 97e9), (Metric::TotalAssets, 352e9)],
            ),
            financials(
                "MSFT",
                &[(Metric::Revenue, 212e9), (Metric::NetIncome, 72e9), (Metric::TotalAssets, 412e9)],
            ),
            financials("ORCL", &[(Metric::Revenue, 50e9), (Metric::TotalAssets, 134e9)]),
        ])
    }

    #[tokio::test]
    async fn test_partial_failure_yields_warning() {
        let provider = provider();
        let request = CompareRequest::new(["AAPL", "ZZZZ", "MSFT"]);

        let report = compare_companies(&provider, &request).await.unwrap();
        assert_eq!(report.companies.len(), 2);
        assert_eq!(report.companies[0].company.ticker, "AAPL");
        assert_eq!(report.companies[1].company.ticker, "MSFT");
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("ZZZZ: "));
        assert_eq!(provider.last_limit(), 1);

        let text = report.to_string();
        assert!(text.contains("### Warnings\n- **ZZZZ**: Not found: ticker ZZZZ"));
        assert!(text.contains("| Metric | AAPL | MSFT |"));
        assert!(text.ends_with("*Data source: SEC EDGAR XBRL | 2 companies compared*"));
    }

    #[tokio::test]
    async fn test_rankings_leave_missing_values_unranked() {
        let provider = provider();
        let request = CompareRequest::new(["ORCL", "AAPL", "MSFT"]);

        let report = compare_companies(&provider, &request).await.unwrap();
        assert_eq!(report.rankings(Metric::Revenue), vec![Some(3), Some(1), Some(2)]);
        assert_eq!(report.rankings(Metric::NetIncome), vec![None, Some(1), Some(2)]);
        assert_eq!(report.rankings(Metric::TotalAssets), vec![Some(3), Some(2), Some(1)]);

        let text = report.to_string();
        assert!(text.contains("| **net_income** | — | #1 | #2 |"));
        assert!(text.contains("| **revenue** | $50.00B | $383.00B | $212.00B |"));
    }

    #[tokio::test]
    async fn test_total_failure_is_error() {
        let provider = provider();
        let request = CompareRequest::new(["XXXX", "YYYY"]);
        let err = compare_companies(&provider, &request).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("XXXX"));
    }
}
