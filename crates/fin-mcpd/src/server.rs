use std::fmt::Display;

use fin::request::{company_identifier, parse_metrics};
use fin::{
    BenchmarkRequest, CompareRequest, EarningsRequest, FilingTextRequest, FinancialIntelligence,
    FinancialsRequest, IndustrySelector, MacroRequest, StockRequest,
};
use rmcp::{
    ErrorData, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SERVER_NAME: &str = "financial-intelligence";

const SERVER_INSTRUCTIONS: &str = r"financial-intelligence answers questions about public companies and the economy from SEC EDGAR, FRED and Yahoo Finance.

Company tools accept a `ticker` or a `cik`:
- `fin_get_company_financials`: XBRL metrics with derived margins and growth, annual or quarterly.
- `fin_get_filing_text`: cleaned text of recent 10-K, 10-Q or 8-K filings.
- `fin_get_earnings_transcript`: Item 2.02 8-K filings as a proxy for earnings calls.

Cross-company tools:
- `fin_compare_companies`: 2-5 tickers side by side with rankings.
- `fin_get_industry_benchmarks`: median, mean and quartiles over up to 15 SIC peers.

Market and macro:
- `fin_get_stock_data`: quote, statistics and price history.
- `fin_get_macro_indicators`: FRED series such as GDP, CPIAUCSL, FEDFUNDS, UNRATE, DGS10.

Metric names: revenue, net_income, ebitda, operating_income, total_assets, total_liabilities,
stockholders_equity, cash, total_debt, depreciation, cost_of_revenue, gross_profit, eps,
shares_outstanding.";

// =============================================================================
// Parameters
// =============================================================================

/// Parameters for `fin_get_company_financials`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub(crate) struct CompanyFinancialsParams {
    /// Stock ticker symbol (e.g., AAPL, MSFT). Provide ticker or cik.
    ticker: Option<String>,
    /// SEC CIK number. Provide ticker or cik.
    cik: Option<String>,
    /// Financial metrics to retrieve (default revenue, net_income, total_assets, stockholders_equity).
    metrics: Option<Vec<String>>,
    /// Reporting period type: annual (default) or quarterly.
    period: Option<String>,
    /// Number of periods to retrieve, 1-20 (default 5).
    limit: Option<usize>,
}

impl CompanyFinancialsParams {
    fn into_request(self) -> fin::Result<FinancialsRequest> {
        let identifier = company_identifier(self.ticker.as_deref(), self.cik.as_deref())?;
        let mut request = FinancialsRequest::new(identifier);
        if let Some(metrics) = self.metrics {
            request = request.with_metrics(parse_metrics(&metrics)?);
        }
        if let Some(period) = self.period {
            request = request.with_period(period.parse()?);
        }
        if let Some(limit) = self.limit {
            request = request.with_limit(limit);
        }
        Ok(request)
    }
}

/// Parameters for `fin_get_filing_text`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub(crate) struct FilingTextParams {
    /// Stock ticker symbol. Provide ticker or cik.
    ticker: Option<String>,
    /// SEC CIK number. Provide ticker or cik.
    cik: Option<String>,
    /// SEC filing type to retrieve: 10-K, 10-Q or 8-K.
    filing_type: String,
    /// Number of most recent filings to retrieve, 1-5 (default 1).
    limit: Option<usize>,
}

impl FilingTextParams {
    fn into_request(self) -> fin::Result<FilingTextRequest> {
        let identifier = company_identifier(self.ticker.as_deref(), self.cik.as_deref())?;
        let request = FilingTextRequest::new(identifier, self.filing_type.parse()?);
        Ok(match self.limit {
            Some(limit) => request.with_limit(limit),
            None => request,
        })
    }
}

/// Parameters for `fin_get_stock_data`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub(crate) struct StockDataParams {
    /// Stock ticker symbol (e.g., AAPL, MSFT).
    ticker: String,
    /// Time period for historical data: 1d, 5d, 1mo, 3mo, 6mo, 1y (default), 2y, 5y, max.
    period: Option<String>,
    /// Data interval: 1d (default), 1wk, 1mo.
    interval: Option<String>,
}

impl StockDataParams {
    fn into_request(self) -> fin::Result<StockRequest> {
        let mut request = StockRequest::new(self.ticker);
        if let Some(range) = self.period {
            request = request.with_range(range.parse()?);
        }
        if let Some(interval) = self.interval {
            request = request.with_interval(interval.parse()?);
        }
        Ok(request)
    }
}

/// Parameters for `fin_get_macro_indicators`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub(crate) struct MacroIndicatorsParams {
    /// FRED series ID (e.g., "GDP", "CPIAUCSL", "FEDFUNDS", "UNRATE", "DGS10").
    series_id: String,
    /// Start date in YYYY-MM-DD format.
    start_date: Option<String>,
    /// End date in YYYY-MM-DD format.
    end_date: Option<String>,
    /// Number of observations to return, 1-1000 (default 20, most recent first).
    limit: Option<usize>,
}

impl MacroIndicatorsParams {
    fn into_request(self) -> MacroRequest {
        let request = MacroRequest::new(&self.series_id).with_dates(self.start_date, self.end_date);
        match self.limit {
            Some(limit) => request.with_limit(limit),
            None => request,
        }
    }
}

/// Parameters for `fin_get_earnings_transcript`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub(crate) struct EarningsTranscriptParams {
    /// Stock ticker symbol. Provide ticker or cik.
    ticker: Option<String>,
    /// SEC CIK number. Provide ticker or cik.
    cik: Option<String>,
    /// Number of most recent earnings-related 8-K filings, 1-5 (default 1).
    limit: Option<usize>,
}

impl EarningsTranscriptParams {
    fn into_request(self) -> fin::Result<EarningsRequest> {
        let identifier = company_identifier(self.ticker.as_deref(), self.cik.as_deref())?;
        let request = EarningsRequest::new(identifier);
        Ok(match self.limit {
            Some(limit) => request.with_limit(limit),
            None => request,
        })
    }
}

/// Parameters for `fin_compare_companies`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub(crate) struct CompareCompaniesParams {
    /// Array of 2-5 stock ticker symbols to compare.
    tickers: Vec<String>,
    /// Financial metrics to compare (default revenue, net_income, total_assets).
    metrics: Option<Vec<String>>,
    /// Reporting period type: annual (default) or quarterly.
    period: Option<String>,
}

impl CompareCompaniesParams {
    fn into_request(self) -> fin::Result<CompareRequest> {
        let mut request = CompareRequest::new(self.tickers);
        if let Some(metrics) = self.metrics {
            request = request.with_metrics(parse_metrics(&metrics)?);
        }
        if let Some(period) = self.period {
            request = request.with_period(period.parse()?);
        }
        Ok(request)
    }
}

/// Parameters for `fin_get_industry_benchmarks`.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub(crate) struct IndustryBenchmarksParams {
    /// SIC industry code (e.g., 7372 for software). Provide sic_code or ticker.
    sic_code: Option<String>,
    /// Ticker to look up SIC code from. Provide sic_code or ticker.
    ticker: Option<String>,
    /// Financial metrics to benchmark (default revenue, net_income, total_assets).
    metrics: Option<Vec<String>>,
}

impl IndustryBenchmarksParams {
    fn into_request(self) -> fin::Result<BenchmarkRequest> {
        let industry =
            IndustrySelector::from_parts(self.sic_code.as_deref(), self.ticker.as_deref())?;
        let request = BenchmarkRequest::new(industry);
        Ok(match self.metrics {
            Some(metrics) => request.with_metrics(parse_metrics(&metrics)?),
            None => request,
        })
    }
}

// =============================================================================
// Server
// =============================================================================

/// Renders a report, or flags the call as failed with the error text.
fn render<T: Display>(tool: &'static str, result: fin::Result<T>) -> CallToolResult {
    match result {
        Ok(report) => {
            debug!(tool, "Tool call succeeded");
            CallToolResult::success(vec![Content::text(report.to_string())])
        }
        Err(err) => {
            warn!(tool, error = %err, "Tool call failed");
            CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
        }
    }
}

/// MCP server over a shared [`FinancialIntelligence`] service.
#[derive(Clone)]
pub(crate) struct FinMcp {
    tool_router: ToolRouter<Self>,
    service: FinancialIntelligence,
}

impl FinMcp {
    pub(crate) fn new(service: FinancialIntelligence) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service,
        }
    }
}

#[tool_router]
impl FinMcp {
    #[tool(
        description = "Retrieve financial metrics (revenue, EBITDA, margins, growth rates) for a public company from SEC EDGAR XBRL data. Supports annual and quarterly periods."
    )]
    async fn fin_get_company_financials(
        &self,
        Parameters(params): Parameters<CompanyFinancialsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = match params.into_request() {
            Ok(request) => self.service.company_financials(&request).await,
            Err(err) => Err(err),
        };
        Ok(render("fin_get_company_financials", result))
    }

    #[tool(
        description = "Retrieve the full text of SEC filings (10-K, 10-Q, 8-K) for qualitative analysis. Returns cleaned text from the primary filing document."
    )]
    async fn fin_get_filing_text(
        &self,
        Parameters(params): Parameters<FilingTextParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = match params.into_request() {
            Ok(request) => self.service.filing_text(&request).await,
            Err(err) => Err(err),
        };
        Ok(render("fin_get_filing_text", result))
    }

    #[tool(
        description = "Get stock price history, current quote, market cap, P/E ratio, and key statistics from Yahoo Finance."
    )]
    async fn fin_get_stock_data(
        &self,
        Parameters(params): Parameters<StockDataParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = match params.into_request() {
            Ok(request) => self.service.stock_data(&request).await,
            Err(err) => Err(err),
        };
        Ok(render("fin_get_stock_data", result))
    }

    #[tool(
        description = "Fetch macroeconomic indicators from FRED (Federal Reserve). Supports GDP, CPI, interest rates, unemployment, and thousands of other series."
    )]
    async fn fin_get_macro_indicators(
        &self,
        Parameters(params): Parameters<MacroIndicatorsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let request = params.into_request();
        let result = self.service.macro_indicators(&request).await;
        Ok(render("fin_get_macro_indicators", result))
    }

    #[tool(
        description = "Extract earnings-related 8-K filings (Item 2.02) as a proxy for earnings call transcripts. Best-effort from public SEC data."
    )]
    async fn fin_get_earnings_transcript(
        &self,
        Parameters(params): Parameters<EarningsTranscriptParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = match params.into_request() {
            Ok(request) => self.service.earnings_releases(&request).await,
            Err(err) => Err(err),
        };
        Ok(render("fin_get_earnings_transcript", result))
    }

    #[tool(
        description = "Side-by-side financial comparison of 2-5 public companies with rankings. Uses SEC EDGAR data."
    )]
    async fn fin_compare_companies(
        &self,
        Parameters(params): Parameters<CompareCompaniesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = match params.into_request() {
            Ok(request) => self.service.compare_companies(&request).await,
            Err(err) => Err(err),
        };
        Ok(render("fin_compare_companies", result))
    }

    #[tool(
        description = "Compute industry benchmark statistics (median, mean, quartiles) by SIC code using SEC EDGAR data from peer companies."
    )]
    async fn fin_get_industry_benchmarks(
        &self,
        Parameters(params): Parameters<IndustryBenchmarksParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let result = match params.into_request() {
            Ok(request) => self.service.industry_benchmarks(&request).await,
            Err(err) => Err(err),
        };
        Ok(render("fin_get_industry_benchmarks", result))
    }
}

#[tool_handler]
impl ServerHandler for FinMcp {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = SERVER_NAME.to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info,
            ..Default::default()
        }
    }
}
