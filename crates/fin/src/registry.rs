//! Provider registry behind the tool pipelines.

use std::sync::Arc;

use fin_core::{
    FilingDataProvider, FundamentalDataProvider, MacroDataProvider, PriceDataProvider, Result,
};
use fin_edgar::EdgarProvider;
use fin_fred::FredProvider;
use fin_yahoo::YahooProvider;
use tracing::{debug, info};

use crate::config::FinConfig;
use crate::request::{
    BenchmarkRequest, CompareRequest, EarningsRequest, FilingTextRequest, FinancialsRequest,
    MacroRequest, StockRequest,
};
use crate::tools::{
    self, BenchmarkReport, ComparisonReport, EarningsReport, FilingTextReport, FinancialsReport,
    MacroReport, StockReport,
};

/// Financial intelligence service.
///
/// Holds one provider per capability and runs the tool pipelines against
/// them. Providers own their HTTP client, rate limiter and caches, so a single
/// service shared behind an `Arc` keeps those process-wide: the ticker
/// directory loads once and concurrent requests share each provider's pacing.
///
/// # Example
///
/// ```rust,ignore
/// use fin::{FinConfig, FinancialIntelligence, CompareRequest};
///
/// let service = FinancialIntelligence::from_config(&FinConfig::new("MyApp/1.0 (me@example.com)"))?;
/// let report = service
///     .compare_companies(&CompareRequest::new(["AAPL", "MSFT", "GOOGL"]))
///     .await?;
/// println!("{report}");
/// ```
#[derive(Clone)]
pub struct FinancialIntelligence {
    fundamentals: Arc<dyn FundamentalDataProvider>,
    filings: Arc<dyn FilingDataProvider>,
    prices: Arc<dyn PriceDataProvider>,
    macro_data: Arc<dyn MacroDataProvider>,
}

impl std::fmt::Debug for FinancialIntelligence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinancialIntelligence")
            .field("fundamentals", &self.fundamentals.name())
            .field("filings", &self.filings.name())
            .field("prices", &self.prices.name())
            .field("macro_data", &self.macro_data.name())
            .finish()
    }
}

impl FinancialIntelligence {
    /// Create a service from explicit providers.
    #[must_use]
    pub fn new(
        fundamentals: Arc<dyn FundamentalDataProvider>,
        filings: Arc<dyn FilingDataProvider>,
        prices: Arc<dyn PriceDataProvider>,
        macro_data: Arc<dyn MacroDataProvider>,
    ) -> Self {
        Self {
            fundamentals,
            filings,
            prices,
            macro_data,
        }
    }

    /// Build the SEC EDGAR, FRED and Yahoo Finance providers from `config`.
    ///
    /// One EDGAR provider serves both fundamentals and filings so they share
    /// its rate limiter and ticker directory.
    pub fn from_config(config: &FinConfig) -> Result<Self> {
        config.validate()?;

        let edgar = Arc::new(EdgarProvider::with_options(
            &config.edgar_user_agent,
            config.edgar.rate,
            config.edgar.timeout,
        )?);
        let fred = FredProvider::with_options(
            config.fred_api_key.clone(),
            config.fred.rate,
            config.fred.timeout,
        )?;
        let yahoo = YahooProvider::with_options(config.yahoo.rate, config.yahoo.timeout)?;

        info!(
            edgar_rate = config.edgar.rate,
            fred_rate = config.fred.rate,
            yahoo_rate = config.yahoo.rate,
            fred_api_key = fred.has_api_key(),
            "Configured data providers"
        );

        Ok(Self::new(
            edgar.clone(),
            edgar,
            Arc::new(yahoo),
            Arc::new(fred),
        ))
    }

    /// Replace the fundamentals provider.
    #[must_use]
    pub fn with_fundamentals(mut self, provider: Arc<dyn FundamentalDataProvider>) -> Self {
        debug!(provider = provider.name(), "Registering fundamentals provider");
        self.fundamentals = provider;
        self
    }

    /// Replace the filings provider.
    #[must_use]
    pub fn with_filings(mut self, provider: Arc<dyn FilingDataProvider>) -> Self {
        debug!(provider = provider.name(), "Registering filings provider");
        self.filings = provider;
        self
    }

    /// Replace the price provider.
    #[must_use]
    pub fn with_prices(mut self, provider: Arc<dyn PriceDataProvider>) -> Self {
        debug!(provider = provider.name(), "Registering price provider");
        self.prices = provider;
        self
    }

    /// Replace the macroeconomic provider.
    #[must_use]
    pub fn with_macro_data(mut self, provider: Arc<dyn MacroDataProvider>) -> Self {
        debug!(provider = provider.name(), "Registering macro provider");
        self.macro_data = provider;
        self
    }

    /// Metric table with derived rows for one company.
    pub async fn company_financials(&self, request: &FinancialsRequest) -> Result<FinancialsReport> {
        tools::company_financials(self.fundamentals.as_ref(), request).await
    }

    /// Cleaned text of recent filings.
    pub async fn filing_text(&self, request: &FilingTextRequest) -> Result<FilingTextReport> {
        tools::filing_text(self.filings.as_ref(), request).await
    }

    /// Quote and price history.
    pub async fn stock_data(&self, request: &StockRequest) -> Result<StockReport> {
        tools::stock_data(self.prices.as_ref(), request).await
    }

    /// Macroeconomic series metadata and observations.
    pub async fn macro_indicators(&self, request: &MacroRequest) -> Result<MacroReport> {
        tools::macro_indicators(self.macro_data.as_ref(), request).await
    }

    /// Item 2.02 8-K filings as an earnings call proxy.
    pub async fn earnings_releases(&self, request: &EarningsRequest) -> Result<EarningsReport> {
        tools::earnings_releases(self.filings.as_ref(), request).await
    }

    /// Side-by-side comparison of 2 to 5 companies.
    pub async fn compare_companies(&self, request: &CompareRequest) -> Result<ComparisonReport> {
        tools::compare_companies(self.fundamentals.as_ref(), request).await
    }

    /// Distributional statistics over an industry's peers.
    pub async fn industry_benchmarks(&self, request: &BenchmarkRequest) -> Result<BenchmarkReport> {
        tools::industry_benchmarks(self.fundamentals.as_ref(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StaticFilings, StaticFundamentals, financials};
    use fin_core::Metric;

    fn service() -> FinancialIntelligence {
        FinancialIntelligence::from_config(&FinConfig::new("Test/1.0 (test@example.com)")).unwrap()
    }

    #[test]
    fn test_from_config_wires_providers() {
        let debug = format!("{:?}", service());
        assert!(debug.contains("SEC EDGAR"));
        assert!(debug.contains("FRED"));
        assert!(debug.contains("Yahoo Finance"));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        assert!(FinancialIntelligence::from_config(&FinConfig::new("")).is_err());
    }

    #[tokio::test]
    async fn test_pipelines_use_registered_providers() {
        let service = service()
            .with_fundamentals(Arc::new(StaticFundamentals::new(vec![
                financials("AAPL", &[(Metric::Revenue, 383e9)]),
                financials("MSFT", &[(Metric::Revenue, 212e9)]),
            ])))
            .with_filings(Arc::new(StaticFilings::new(Vec::new())));

        let report = service
            .compare_companies(&CompareRequest::new(["AAPL", "MSFT"]))
            .await
            .unwrap();
        assert_eq!(report.companies.len(), 2);

        let report = service
            .earnings_releases(&EarningsRequest::new("AAPL"))
            .await
            .unwrap();
        assert!(report.releases.is_empty());
    }

    #[tokio::test]
    async fn test_missing_fred_key_surfaces_on_call() {
        let err = service()
            .macro_indicators(&MacroRequest::new("GDP"))
            .await
            .unwrap_err();
        assert!(matches!(err, fin_core::FinError::MissingCredential { .. }));
    }
}
