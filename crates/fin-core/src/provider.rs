//! Provider traits for fetching financial data.
//!
//! This module defines the core provider traits:
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FundamentalDataProvider`] - Company info, XBRL metrics and industry peers
//! - [`FilingDataProvider`] - Filing metadata and document text
//! - [`PriceDataProvider`] - Quote and OHLCV history
//! - [`MacroDataProvider`] - Macroeconomic series

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    frequency::{ChartInterval, ChartRange, PeriodType},
    metric::Metric,
    types::{
        CompanyFinancials, CompanyInfo, FilingDocument, FilingForm, FilingInfo,
        MacroIndicatorData, Observation, ObservationQuery, SeriesInfo, StockData, Symbol,
    },
};

/// Base trait for all data providers.
///
/// All data providers must implement this trait to provide basic metadata
/// about the provider.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for fundamental financial data.
///
/// Identifiers are either a ticker or a numeric CIK string.
#[async_trait]
pub trait FundamentalDataProvider: DataProvider {
    /// Fetches company reference information.
    async fn company_info(&self, identifier: &str) -> Result<CompanyInfo>;

    /// Fetches metric series for a company.
    ///
    /// # Arguments
    ///
    /// * `identifier` - Ticker or CIK
    /// * `metrics` - Logical metrics to extract; derivations run on what is requested
    /// * `period_type` - Annual or Quarterly
    /// * `limit` - Maximum number of periods per metric (most recent first)
    async fn financials(
        &self,
        identifier: &str,
        metrics: &[Metric],
        period_type: PeriodType,
        limit: usize,
    ) -> Result<CompanyFinancials>;

    /// Finds up to `limit` companies classified under `sic`.
    async fn companies_by_sic(&self, sic: &str, limit: usize) -> Result<Vec<CompanyInfo>>;
}

/// Provider for regulatory filings.
#[async_trait]
pub trait FilingDataProvider: DataProvider {
    /// Lists the most recent `limit` filings of `form` for a company, newest first.
    async fn filings(
        &self,
        identifier: &str,
        form: FilingForm,
        limit: usize,
    ) -> Result<(CompanyInfo, Vec<FilingInfo>)>;

    /// Fetches and cleans the primary document of `filing`.
    async fn filing_text(
        &self,
        company: &CompanyInfo,
        filing: &FilingInfo,
    ) -> Result<FilingDocument>;
}

/// Provider for price data.
#[async_trait]
pub trait PriceDataProvider: DataProvider {
    /// Fetches a quote snapshot plus history for `symbol`.
    async fn stock_data(
        &self,
        symbol: &Symbol,
        range: ChartRange,
        interval: ChartInterval,
    ) -> Result<StockData>;
}

/// Provider for macroeconomic time series.
#[async_trait]
pub trait MacroDataProvider: DataProvider {
    /// Fetches series metadata.
    async fn series_info(&self, series_id: &str) -> Result<SeriesInfo>;

    /// Fetches observations, most recent first.
    async fn observations(
        &self,
        series_id: &str,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>>;

    /// Fetches metadata and observations concurrently.
    ///
    /// Default implementation joins [`series_info`](Self::series_info) and
    /// [`observations`](Self::observations); the first error wins.
    async fn indicator(
        &self,
        series_id: &str,
        query: &ObservationQuery,
    ) -> Result<MacroIndicatorData> {
        let (series, observations) =
            tokio::try_join!(self.series_info(series_id), self.observations(series_id, query))?;
        Ok(MacroIndicatorData {
            series,
            observations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinError;

    #[derive(Debug)]
    struct StaticMacro {
        fail_info: bool,
    }

    impl DataProvider for StaticMacro {
        fn name(&self) -> &str {
            "Static"
        }

        fn description(&self) -> &str {
            "In-memory macro series"
        }
    }

    #[async_trait]
    impl MacroDataProvider for StaticMacro {
        async fn series_info(&self, series_id: &str) -> Result<SeriesInfo> {
            if self.fail_info {
                return Err(FinError::NotFound(format!("series {series_id}")));
            }
            Ok(SeriesInfo {
                id: series_id.to_string(),
                title: "Unemployment Rate".into(),
                units: "Percent".into(),
                frequency: "Monthly".into(),
                seasonal_adjustment: "Seasonally Adjusted".into(),
                last_updated: "2024-06-07".into(),
                notes: String::new(),
            })
        }

        async fn observations(
            &self,
            _series_id: &str,
            query: &ObservationQuery,
        ) -> Result<Vec<Observation>> {
            Ok((0..query.limit)
                .map(|i| Observation {
                    date: format!("2024-0{}-01", 5 - i),
                    value: Some(4.0),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_indicator_joins_metadata_and_observations() {
        let provider = StaticMacro { fail_info: false };
        let query = ObservationQuery {
            limit: 3,
            ..Default::default()
        };

        let data = provider.indicator("UNRATE", &query).await.unwrap();
        assert_eq!(data.series.id, "UNRATE");
        assert_eq!(data.observations.len(), 3);
    }

    #[tokio::test]
    async fn test_indicator_surfaces_first_error() {
        let provider = StaticMacro { fail_info: true };
        let err = provider
            .indicator("NOPE", &ObservationQuery::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
