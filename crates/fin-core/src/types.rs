//! Core value types shared by providers and tool pipelines.
//!
//! This module defines the immutable, per-request data structures:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`Cik`] - SEC Central Index Key
//! - [`CompanyInfo`] - Company reference information
//! - [`MetricSeries`] / [`DerivedSeries`] - Extracted and computed metric series
//! - [`CompanyFinancials`] - One company's metrics plus derivations
//! - [`FilingForm`] / [`FilingInfo`] / [`FilingDocument`] - Filing metadata and text
//! - [`StockQuote`] / [`PricePoint`] / [`StockData`] - Price data
//! - [`SeriesInfo`] / [`Observation`] / [`MacroIndicatorData`] - Macro series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinError;
use crate::frequency::{ChartInterval, ChartRange, PeriodType};
use crate::metric::{DerivedMetric, Metric};

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, trimming and converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// SEC Central Index Key.
///
/// Displayed without padding; [`Cik::padded`] gives the 10-digit form EDGAR
/// URLs require.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cik(u64);

impl Cik {
    /// Wraps a numeric CIK.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Zero-padded 10-digit form, e.g. `0000320193`.
    #[must_use]
    pub fn padded(&self) -> String {
        format!("{:010}", self.0)
    }

    /// True when `s` is a non-empty string of ASCII digits, i.e. an identifier
    /// that is already a CIK and needs no ticker resolution.
    #[must_use]
    pub fn is_numeric_identifier(s: &str) -> bool {
        let s = s.trim();
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cik {
    type Err = FinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_numeric_identifier(s) {
            return Err(FinError::InvalidArgument(format!("'{s}' is not a numeric CIK")));
        }
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| FinError::InvalidArgument(format!("invalid CIK '{s}': {e}")))
    }
}

/// Company reference information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// SEC Central Index Key.
    pub cik: Cik,
    /// Primary ticker (uppercase).
    pub ticker: String,
    /// Registrant name.
    pub name: String,
    /// Standard Industrial Classification code (may be empty).
    pub sic: String,
    /// SIC description (may be empty).
    pub sic_description: String,
    /// Exchanges the company is listed on.
    pub exchanges: Vec<String>,
}

/// One reported value of a logical metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    /// Period label, e.g. `FY2023` or `Q1 2024`.
    pub period: String,
    /// Period end date.
    pub end_date: NaiveDate,
    /// Reported value.
    pub value: f64,
    /// Filing form the value came from.
    pub form: String,
    /// Date the filing was made (as reported).
    pub filed: String,
}

/// Time-ordered series for one logical metric.
///
/// Points are sorted descending by period end date with no duplicate dates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    /// The logical metric.
    pub metric: Metric,
    /// Points, most recent first.
    pub points: Vec<MetricPoint>,
}

impl MetricSeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn empty(metric: Metric) -> Self {
        Self {
            metric,
            points: Vec::new(),
        }
    }

    /// True when no points were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent point, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&MetricPoint> {
        self.points.first()
    }

    /// The point ending on `date`, if any.
    #[must_use]
    pub fn at(&self, date: NaiveDate) -> Option<&MetricPoint> {
        self.points.iter().find(|p| p.end_date == date)
    }
}

/// One computed value of a derived metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedPoint {
    /// Period label of the anchoring operand.
    pub period: String,
    /// Period end date of the anchoring operand.
    pub end_date: NaiveDate,
    /// Computed value, `None` when an operand is missing or a divisor is zero.
    pub value: Option<f64>,
}

/// Series for one derived metric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedSeries {
    /// The derived metric.
    pub metric: DerivedMetric,
    /// Points, most recent first.
    pub points: Vec<DerivedPoint>,
}

impl DerivedSeries {
    /// Value of the most recent point, if it has one.
    #[must_use]
    pub fn latest_value(&self) -> Option<f64> {
        self.points.first().and_then(|p| p.value)
    }
}

/// A company's extracted metrics and derivations for one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    /// Company reference information.
    pub company: CompanyInfo,
    /// Period type the series were extracted for.
    pub period_type: PeriodType,
    /// Extracted series, in request order, excluding derived-only metrics.
    pub metrics: Vec<MetricSeries>,
    /// Derived series that could be computed from the request.
    pub derived: Vec<DerivedSeries>,
}

impl CompanyFinancials {
    /// The extracted series for `metric`, if it was requested.
    #[must_use]
    pub fn metric(&self, metric: Metric) -> Option<&MetricSeries> {
        self.metrics.iter().find(|m| m.metric == metric)
    }

    /// The derived series for `metric`, if it was computed.
    #[must_use]
    pub fn derived(&self, metric: DerivedMetric) -> Option<&DerivedSeries> {
        self.derived.iter().find(|d| d.metric == metric)
    }

    /// Most recent value of `metric`, if any.
    #[must_use]
    pub fn latest(&self, metric: Metric) -> Option<f64> {
        self.metric(metric).and_then(MetricSeries::latest).map(|p| p.value)
    }

    /// True when neither extracted nor derived data is present.
    #[must_use]
    pub fn has_no_data(&self) -> bool {
        self.metrics.iter().all(MetricSeries::is_empty) && self.derived.is_empty()
    }
}

/// SEC filing form types exposed through the tool surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingForm {
    /// Annual report.
    #[serde(rename = "10-K")]
    TenK,
    /// Quarterly report.
    #[serde(rename = "10-Q")]
    TenQ,
    /// Current report.
    #[serde(rename = "8-K")]
    EightK,
}

impl FilingForm {
    /// Form name as it appears in EDGAR submissions.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TenK => "10-K",
            Self::TenQ => "10-Q",
            Self::EightK => "8-K",
        }
    }
}

impl fmt::Display for FilingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilingForm {
    type Err = FinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "10-K" => Ok(Self::TenK),
            "10-Q" => Ok(Self::TenQ),
            "8-K" => Ok(Self::EightK),
            other => Err(FinError::InvalidArgument(format!(
                "filing_type must be one of 10-K, 10-Q, 8-K, got '{other}'"
            ))),
        }
    }
}

/// Metadata of one filing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingInfo {
    /// Accession number, e.g. `0000320193-24-000123`.
    pub accession_number: String,
    /// Filing date.
    pub filing_date: String,
    /// Report date (falls back to the filing date).
    pub report_date: String,
    /// Form type.
    pub form: String,
    /// Primary document file name (may be empty).
    pub primary_document: String,
    /// Primary document description (may be empty).
    pub primary_doc_description: String,
    /// Comma-separated 8-K items (may be empty).
    pub items: String,
}

impl FilingInfo {
    /// True for 8-K filings reporting results of operations (Item 2.02).
    #[must_use]
    pub fn is_earnings_release(&self) -> bool {
        self.items.to_ascii_lowercase().contains("2.02")
    }
}

/// Cleaned text of a filing's primary document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingDocument {
    /// The filing the text was read from.
    pub filing: FilingInfo,
    /// Markup-free text, possibly truncated.
    pub text: String,
    /// True when the text was cut at the character cap.
    pub truncated: bool,
}

/// Quote snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    /// Ticker (uppercase).
    pub ticker: String,
    /// Display name.
    pub name: String,
    /// Last price.
    pub price: f64,
    /// Change versus previous close.
    pub change: f64,
    /// Change versus previous close in percent.
    pub change_percent: f64,
    /// Market capitalization, when the source provides it.
    pub market_cap: Option<f64>,
    /// Trailing P/E, when the source provides it.
    pub pe_ratio: Option<f64>,
    /// Forward P/E, when the source provides it.
    pub forward_pe: Option<f64>,
    /// Dividend yield as a fraction, when the source provides it.
    pub dividend_yield: Option<f64>,
    /// 52-week high.
    pub fifty_two_week_high: f64,
    /// 52-week low.
    pub fifty_two_week_low: f64,
    /// Average volume over the recent history.
    pub avg_volume: u64,
    /// Beta, when the source provides it.
    pub beta: Option<f64>,
}

/// One OHLCV bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bar date (UTC).
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: u64,
}

/// Quote plus price history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockData {
    /// Quote snapshot.
    pub quote: StockQuote,
    /// History, oldest first.
    pub history: Vec<PricePoint>,
    /// Requested range.
    pub range: ChartRange,
    /// Requested interval.
    pub interval: ChartInterval,
}

/// Metadata of a macroeconomic series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesInfo {
    /// Series identifier, e.g. `GDP`.
    pub id: String,
    /// Series title.
    pub title: String,
    /// Units description.
    pub units: String,
    /// Frequency description.
    pub frequency: String,
    /// Seasonal adjustment description.
    pub seasonal_adjustment: String,
    /// Last update timestamp (as reported).
    pub last_updated: String,
    /// Free-form notes (may be empty).
    pub notes: String,
}

/// One observation of a macroeconomic series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation date.
    pub date: String,
    /// Value, `None` when the source reports it as missing.
    pub value: Option<f64>,
}

/// Filters for an observations request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationQuery {
    /// Earliest observation date (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Latest observation date (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Maximum number of observations, most recent first.
    pub limit: usize,
}

impl Default for ObservationQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            limit: 20,
        }
    }
}

/// Series metadata plus observations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicatorData {
    /// Series metadata.
    pub series: SeriesInfo,
    /// Observations, most recent first.
    pub observations: Vec<Observation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        assert_eq!(Symbol::new(" aapl ").as_str(), "AAPL");
        assert_eq!(Symbol::from("msft").to_string(), "MSFT");
    }

    #[test]
    fn test_cik_padding_and_parse() {
        let cik: Cik = "320193".parse().unwrap();
        assert_eq!(cik.padded(), "0000320193");
        assert_eq!(cik.to_string(), "320193");

        let cik: Cik = "0000320193".parse().unwrap();
        assert_eq!(cik.value(), 320_193);

        assert!("AAPL".parse::<Cik>().is_err());
        assert!("".parse::<Cik>().is_err());
    }

    #[test]
    fn test_numeric_identifier() {
        assert!(Cik::is_numeric_identifier("789019"));
        assert!(!Cik::is_numeric_identifier("BRK.B"));
        assert!(!Cik::is_numeric_identifier("  "));
    }

    #[test]
    fn test_filing_form_parse() {
        assert_eq!("8-k".parse::<FilingForm>().unwrap(), FilingForm::EightK);
        assert!("S-1".parse::<FilingForm>().is_err());
    }

    #[test]
    fn test_earnings_release_detection() {
        let mut filing = FilingInfo {
            accession_number: "0000320193-24-000001".into(),
            filing_date: "2024-02-01".into(),
            report_date: "2024-02-01".into(),
            form: "8-K".into(),
            primary_document: "a8-k.htm".into(),
            primary_doc_description: String::new(),
            items: "2.02,9.01".into(),
        };
        assert!(filing.is_earnings_release());

        filing.items = "5.07".into();
        assert!(!filing.is_earnings_release());
    }

    #[test]
    fn test_series_lookup() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let series = MetricSeries {
            metric: Metric::Revenue,
            points: vec![MetricPoint {
                period: "FY2023".into(),
                end_date: date,
                value: 10.0,
                form: "10-K".into(),
                filed: "2024-02-01".into(),
            }],
        };
        assert_eq!(series.at(date).map(|p| p.value), Some(10.0));
        assert_eq!(series.latest().map(|p| p.period.as_str()), Some("FY2023"));
        assert!(MetricSeries::empty(Metric::Cash).is_empty());
    }
}
