//! Validated tool requests.
//!
//! Each request starts from the tool defaults via `new` and is adjusted with
//! `with_*` builders. Pipelines call `validate` before any provider request
//! is made, so argument errors never cost an upstream round trip.

use std::ops::RangeInclusive;

use fin_core::{
    ChartInterval, ChartRange, FilingForm, FinError, Metric, ObservationQuery, PeriodType, Result,
    Symbol,
};

/// Allowed period counts for company financials.
pub const FINANCIALS_LIMIT: RangeInclusive<usize> = 1..=20;
/// Default period count for company financials.
pub const DEFAULT_FINANCIALS_LIMIT: usize = 5;
/// Allowed filing counts for filing text and earnings releases.
pub const FILINGS_LIMIT: RangeInclusive<usize> = 1..=5;
/// Allowed observation counts for macro indicators.
pub const MACRO_LIMIT: RangeInclusive<usize> = 1..=1000;
/// Allowed number of tickers in a comparison.
pub const COMPARE_TICKERS: RangeInclusive<usize> = 2..=5;
/// Maximum number of peers considered for industry benchmarks.
pub const MAX_INDUSTRY_PEERS: usize = 15;

/// Picks the first non-blank of `ticker` and `cik`.
pub fn company_identifier(ticker: Option<&str>, cik: Option<&str>) -> Result<String> {
    [ticker, cik]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| FinError::InvalidArgument("Either ticker or cik must be provided.".into()))
}

/// Parses metric names, dropping duplicates and keeping the first occurrence.
pub fn parse_metrics<S: AsRef<str>>(names: &[S]) -> Result<Vec<Metric>> {
    let mut metrics = Vec::with_capacity(names.len());
    for name in names {
        let metric: Metric = name.as_ref().parse()?;
        if !metrics.contains(&metric) {
            metrics.push(metric);
        }
    }
    Ok(metrics)
}

fn check_limit(name: &str, value: usize, range: &RangeInclusive<usize>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(FinError::InvalidArgument(format!(
            "{name} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

fn check_metrics(metrics: &[Metric]) -> Result<()> {
    if metrics.is_empty() {
        return Err(FinError::InvalidArgument(format!(
            "at least one metric is required. Options: {}",
            Metric::options()
        )));
    }
    Ok(())
}

fn check_identifier(identifier: &str) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(FinError::InvalidArgument(
            "Either ticker or cik must be provided.".into(),
        ));
    }
    Ok(())
}

// =============================================================================
// Company financials
// =============================================================================

/// Request for a company's metric table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinancialsRequest {
    /// Ticker or CIK.
    pub identifier: String,
    /// Metrics to extract, in display order.
    pub metrics: Vec<Metric>,
    /// Annual or quarterly.
    pub period: PeriodType,
    /// Number of periods, 1 to 20.
    pub limit: usize,
}

impl FinancialsRequest {
    /// Request with the default metrics, annual periods and 5 periods.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            metrics: Metric::DEFAULT_FINANCIALS.to_vec(),
            period: PeriodType::Annual,
            limit: DEFAULT_FINANCIALS_LIMIT,
        }
    }

    /// Set the metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set the period type.
    #[must_use]
    pub const fn with_period(mut self, period: PeriodType) -> Self {
        self.period = period;
        self
    }

    /// Set the period count.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Checks the identifier, metrics and limit.
    pub fn validate(&self) -> Result<()> {
        check_identifier(&self.identifier)?;
        check_metrics(&self.metrics)?;
        check_limit("limit", self.limit, &FINANCIALS_LIMIT)
    }
}

// =============================================================================
// Filings
// =============================================================================

/// Request for the text of recent filings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilingTextRequest {
    /// Ticker or CIK.
    pub identifier: String,
    /// Filing form.
    pub form: FilingForm,
    /// Number of filings, 1 to 5.
    pub limit: usize,
}

impl FilingTextRequest {
    /// Request for the most recent filing of `form`.
    #[must_use]
    pub fn new(identifier: impl Into<String>, form: FilingForm) -> Self {
        Self {
            identifier: identifier.into(),
            form,
            limit: 1,
        }
    }

    /// Set the filing count.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Checks the identifier and limit.
    pub fn validate(&self) -> Result<()> {
        check_identifier(&self.identifier)?;
        check_limit("limit", self.limit, &FILINGS_LIMIT)
    }
}

/// Request for earnings-release 8-K filings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EarningsRequest {
    /// Ticker or CIK.
    pub identifier: String,
    /// Number of releases, 1 to 5.
    pub limit: usize,
}

impl EarningsRequest {
    /// Request for the most recent release.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            limit: 1,
        }
    }

    /// Set the release count.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Checks the identifier and limit.
    pub fn validate(&self) -> Result<()> {
        check_identifier(&self.identifier)?;
        check_limit("limit", self.limit, &FILINGS_LIMIT)
    }
}

// =============================================================================
// Market and macro data
// =============================================================================

/// Request for a quote and price history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StockRequest {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// History span.
    pub range: ChartRange,
    /// Bar size.
    pub interval: ChartInterval,
}

impl StockRequest {
    /// One year of daily bars.
    #[must_use]
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            range: ChartRange::default(),
            interval: ChartInterval::default(),
        }
    }

    /// Set the history span.
    #[must_use]
    pub const fn with_range(mut self, range: ChartRange) -> Self {
        self.range = range;
        self
    }

    /// Set the bar size.
    #[must_use]
    pub const fn with_interval(mut self, interval: ChartInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Checks the ticker.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.as_str().is_empty() {
            return Err(FinError::InvalidArgument("ticker must be provided".into()));
        }
        Ok(())
    }
}

/// Request for a macroeconomic series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroRequest {
    /// FRED series id, with common aliases already mapped.
    pub series_id: String,
    /// Date filter and observation count.
    pub query: ObservationQuery,
}

impl MacroRequest {
    /// The 20 most recent observations of `series_id`.
    ///
    /// Aliases such as `UNEMPLOYMENT` map to their series id.
    #[must_use]
    pub fn new(series_id: &str) -> Self {
        Self {
            series_id: fin_fred::series_id(series_id),
            query: ObservationQuery::default(),
        }
    }

    /// Restrict observations to `start..=end` (`YYYY-MM-DD`).
    #[must_use]
    pub fn with_dates(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.query.start_date = start.filter(|s| !s.trim().is_empty());
        self.query.end_date = end.filter(|s| !s.trim().is_empty());
        self
    }

    /// Set the observation count.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.query.limit = limit;
        self
    }

    /// Checks the series id, dates and limit.
    pub fn validate(&self) -> Result<()> {
        if self.series_id.is_empty() {
            return Err(FinError::InvalidArgument("series_id must be provided".into()));
        }
        for date in [&self.query.start_date, &self.query.end_date].into_iter().flatten() {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                FinError::InvalidArgument(format!("dates must be YYYY-MM-DD, got '{date}'"))
            })?;
        }
        check_limit("limit", self.query.limit, &MACRO_LIMIT)
    }
}

// =============================================================================
// Cross-company
// =============================================================================

/// Request for a side-by-side comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareRequest {
    /// 2 to 5 tickers, in column order.
    pub tickers: Vec<String>,
    /// Metrics to compare and rank.
    pub metrics: Vec<Metric>,
    /// Annual or quarterly; only the latest period is used.
    pub period: PeriodType,
}

impl CompareRequest {
    /// Compare the default peer metrics on the latest annual period.
    #[must_use]
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tickers: tickers.into_iter().map(Into::into).collect(),
            metrics: Metric::DEFAULT_PEER.to_vec(),
            period: PeriodType::Annual,
        }
    }

    /// Set the metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set the period type.
    #[must_use]
    pub const fn with_period(mut self, period: PeriodType) -> Self {
        self.period = period;
        self
    }

    /// Checks the ticker count and metrics.
    pub fn validate(&self) -> Result<()> {
        if !COMPARE_TICKERS.contains(&self.tickers.len()) {
            return Err(FinError::InvalidArgument(format!(
                "tickers must list between {} and {} symbols, got {}",
                COMPARE_TICKERS.start(),
                COMPARE_TICKERS.end(),
                self.tickers.len()
            )));
        }
        if self.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err(FinError::InvalidArgument("tickers must not be blank".into()));
        }
        check_metrics(&self.metrics)
    }
}

/// How the benchmark industry is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndustrySelector {
    /// An explicit SIC code.
    Sic(String),
    /// The SIC code of this company.
    Ticker(String),
}

impl IndustrySelector {
    /// Prefers `sic_code` over `ticker`; blank values count as absent.
    pub fn from_parts(sic_code: Option<&str>, ticker: Option<&str>) -> Result<Self> {
        fn non_blank(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }
        match (non_blank(sic_code), non_blank(ticker)) {
            (Some(sic), _) => Ok(Self::Sic(sic.to_string())),
            (None, Some(ticker)) => Ok(Self::Ticker(ticker.to_string())),
            (None, None) => Err(FinError::InvalidArgument(
                "Either sic_code or ticker must be provided.".into(),
            )),
        }
    }
}

/// Request for industry benchmark statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchmarkRequest {
    /// Industry to benchmark.
    pub industry: IndustrySelector,
    /// Metrics to summarize.
    pub metrics: Vec<Metric>,
}

impl BenchmarkRequest {
    /// Benchmark the default peer metrics.
    #[must_use]
    pub fn new(industry: IndustrySelector) -> Self {
        Self {
            industry,
            metrics: Metric::DEFAULT_PEER.to_vec(),
        }
    }

    /// Set the metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Vec<Metric>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Checks the metrics.
    pub fn validate(&self) -> Result<()> {
        check_metrics(&self.metrics)
    }
}
