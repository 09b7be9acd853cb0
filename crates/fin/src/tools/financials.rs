//! Company financials pipeline.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use fin_core::{CompanyFinancials, FundamentalDataProvider, Result};
use tracing::debug;

use crate::format::{self, MISSING};
use crate::request::FinancialsRequest;

/// Extracted and derived metrics for one company.
#[derive(Clone, Debug, PartialEq)]
pub struct FinancialsReport {
    /// Provider payload.
    pub financials: CompanyFinancials,
    /// Requested period count.
    pub limit: usize,
}

/// Resolves the company and extracts the requested metrics.
pub async fn company_financials(
    provider: &dyn FundamentalDataProvider,
    request: &FinancialsRequest,
) -> Result<FinancialsReport> {
    request.validate()?;
    debug!(
        identifier = %request.identifier,
        period = %request.period,
        limit = request.limit,
        provider = provider.name(),
        "Fetching company financials"
    );
    let financials = provider
        .financials(&request.identifier, &request.metrics, request.period, request.limit)
        .await?;
    Ok(FinancialsReport {
        financials,
        limit: request.limit,
    })
}

impl FinancialsReport {
    /// Period columns, most recent first.
    ///
    /// Columns are keyed by period end date: a filer may tag comparative
    /// figures with the fiscal year of the filing, so labels alone can repeat.
    #[must_use]
    pub fn columns(&self) -> Vec<(NaiveDate, String)> {
        let mut columns: BTreeMap<NaiveDate, String> = BTreeMap::new();
        let metric_points = self
            .financials
            .metrics
            .iter()
            .flat_map(|m| m.points.iter().map(|p| (p.end_date, &p.period)));
        let derived_points = self
            .financials
            .derived
            .iter()
            .flat_map(|d| d.points.iter().map(|p| (p.end_date, &p.period)));
        for (end, label) in metric_points.chain(derived_points) {
            columns.entry(end).or_insert_with(|| label.clone());
        }
        columns.into_iter().rev().collect()
    }
}

impl fmt::Display for FinancialsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let company = &self.financials.company;
        let period = self.financials.period_type;
        let exchanges = if company.exchanges.is_empty() {
            "N/A".to_string()
        } else {
            company.exchanges.join(", ")
        };

        writeln!(f, "## {} ({})", company.name, company.ticker)?;
        writeln!(f)?;
        writeln!(f, "| Field | Value |")?;
        writeln!(f, "|-------|-------|")?;
        writeln!(f, "| CIK | {} |", company.cik)?;
        writeln!(f, "| SIC | {} — {} |", company.sic, format::cell(&company.sic_description))?;
        writeln!(f, "| Exchange(s) | {exchanges} |")?;
        writeln!(f)?;

        let columns = self.columns();
        if !columns.is_empty() {
            writeln!(f, "### Financial Metrics ({period})")?;
            writeln!(f)?;
            let headers: Vec<String> = columns
                .iter()
                .map(|(end, label)| format!("{label} ({end})"))
                .collect();
            writeln!(f, "| Metric | {} |", headers.join(" | "))?;
            writeln!(f, "|--------|{}|", vec!["-------"; columns.len()].join("|"))?;

            for series in &self.financials.metrics {
                let values: Vec<String> = columns
                    .iter()
                    .map(|(end, _)| {
                        format::metric_value(series.metric, series.at(*end).map(|p| p.value))
                    })
                    .collect();
                writeln!(f, "| {} | {} |", series.metric, values.join(" | "))?;
            }
            for series in &self.financials.derived {
                let values: Vec<String> = columns
                    .iter()
                    .map(|(end, _)| {
                        series
                            .points
                            .iter()
                            .find(|p| p.end_date == *end)
                            .map_or_else(
                                || MISSING.to_string(),
                                |p| format::derived_value(series.metric, p.value),
                            )
                    })
                    .collect();
                writeln!(f, "| {} | {} |", series.metric, values.join(" | "))?;
            }
        }

        if self.financials.has_no_data() {
            writeln!(
                f,
                "*No financial data found for the requested metrics. The company may use non-standard XBRL tags.*"
            )?;
        }

        writeln!(f)?;
        write!(
            f,
            "*Data source: SEC EDGAR XBRL | {period} data | Last {} periods*",
            self.limit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StaticFundamentals, financials};
    use fin_core::{DerivedMetric, DerivedPoint, DerivedSeries, FinError, Metric, PeriodType};

    #[tokio::test]
    async fn test_report_renders_columns_and_derived_rows() {
        let mut data = financials("AAPL", &[(Metric::Revenue, 383_290_000_000.0)]);
        data.derived.push(DerivedSeries {
            metric: DerivedMetric::NetMarginPct,
            points: vec![DerivedPoint {
                period: "FY2023".into(),
                end_date: NaiveDate::from_ymd_opt(2023, 9, 30).unwrap(),
                value: Some(25.31),
            }],
        });
        let provider = StaticFundamentals::new(vec![data]);

        let request = FinancialsRequest::new("AAPL").with_metrics(vec![Metric::Revenue]);
        let report = company_financials(&provider, &request).await.unwrap();
        let text = report.to_string();

        assert!(text.starts_with("## AAPL Inc. (AAPL)"));
        assert!(text.contains("| Metric | FY2023 (2023-09-30) |"));
        assert!(text.contains("| revenue | $383.29B |"));
        assert!(text.contains("| net_margin_pct | 25.3% |"));
        assert!(text.ends_with("*Data source: SEC EDGAR XBRL | annual data | Last 5 periods*"));
    }

    #[tokio::test]
    async fn test_empty_series_notes_missing_data() {
        let provider = StaticFundamentals::new(vec![financials("ODD", &[])]);

        let request = FinancialsRequest::new("ODD").with_period(PeriodType::Quarterly);
        let text = company_financials(&provider, &request).await.unwrap().to_string();
        assert!(text.contains("*No financial data found"));
        assert!(!text.contains("### Financial Metrics"));
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_provider() {
        let provider = StaticFundamentals::new(Vec::new());
        let request = FinancialsRequest::new("AAPL").with_limit(50);
        let err = company_financials(&provider, &request).await.unwrap_err();
        assert!(matches!(err, FinError::InvalidArgument(_)));
        assert_eq!(provider.calls(), 0);
    }
}
