//! XBRL company facts and logical metric extraction.
//!
//! Filers label the same concept with different taxonomy tags, and a single
//! filer may switch tags over time. Each [`Metric`] maps to a list of candidate
//! tags; extraction builds a deduplicated series per candidate and keeps the
//! one that reports the most recent period.

use chrono::{Datelike, NaiveDate};
use fin_core::{Metric, MetricPoint, MetricSeries, PeriodType};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Taxonomies searched for a tag, in order.
pub const TAXONOMIES: [&str; 2] = ["us-gaap", "dei"];

/// Accepted units, in order of preference.
pub const UNIT_PREFERENCE: [&str; 4] = ["USD", "USD/shares", "shares", "pure"];

// =============================================================================
// XBRL Tag Mappings
// =============================================================================

/// Candidate XBRL tags for a logical metric.
///
/// Derived-only metrics have no tags and always extract to an empty series.
#[must_use]
pub const fn metric_tags(metric: Metric) -> &'static [&'static str] {
    match metric {
        Metric::Revenue => &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "SalesRevenueNet",
            "RevenueFromContractWithCustomerIncludingAssessedTax",
        ],
        Metric::NetIncome => &[
            "NetIncomeLoss",
            "ProfitLoss",
            "NetIncomeLossAvailableToCommonStockholdersBasic",
        ],
        Metric::Ebitda => &[],
        Metric::OperatingIncome => &[
            "OperatingIncomeLoss",
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
        ],
        Metric::TotalAssets => &["Assets"],
        Metric::TotalLiabilities => &["Liabilities"],
        Metric::StockholdersEquity => &[
            "StockholdersEquity",
            "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        ],
        Metric::Cash => &[
            "CashAndCashEquivalentsAtCarryingValue",
            "CashCashEquivalentsAndShortTermInvestments",
        ],
        Metric::TotalDebt => &[
            "LongTermDebt",
            "LongTermDebtAndCapitalLeaseObligations",
            "DebtCurrent",
        ],
        Metric::Depreciation => &[
            "DepreciationDepletionAndAmortization",
            "DepreciationAndAmortization",
            "Depreciation",
        ],
        Metric::CostOfRevenue => &[
            "CostOfRevenue",
            "CostOfGoodsAndServicesSold",
            "CostOfGoodsSold",
        ],
        Metric::GrossProfit => &["GrossProfit"],
        Metric::Eps => &["EarningsPerShareBasic", "EarningsPerShareDiluted"],
        Metric::SharesOutstanding => &[
            "CommonStockSharesOutstanding",
            "WeightedAverageNumberOfShareOutstandingBasicAndDiluted",
            "EntityCommonStockSharesOutstanding",
        ],
    }
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Response from the SEC EDGAR Company Facts API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFacts {
    /// Entity name
    #[serde(default)]
    pub entity_name: String,
    /// Facts organized by taxonomy and tag
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, TagFacts>>,
}

impl CompanyFacts {
    /// Finds a tag in the first taxonomy that carries it.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&TagFacts> {
        TAXONOMIES
            .iter()
            .find_map(|taxonomy| self.facts.get(*taxonomy)?.get(name))
    }
}

/// Facts for a specific XBRL tag.
#[derive(Debug, Default, Deserialize)]
pub struct TagFacts {
    /// Units (USD, shares, etc.) containing the actual fact values
    #[serde(default)]
    pub units: HashMap<String, Vec<RawFact>>,
}

impl TagFacts {
    /// Facts under the first accepted unit present, if any.
    #[must_use]
    pub fn preferred_unit(&self) -> Option<(&'static str, &[RawFact])> {
        UNIT_PREFERENCE
            .iter()
            .find_map(|unit| self.units.get(*unit).map(|facts| (*unit, facts.as_slice())))
    }
}

/// A single reported fact.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawFact {
    /// End date of the period
    #[serde(default)]
    pub end: Option<String>,
    /// Value
    #[serde(default)]
    pub val: Option<f64>,
    /// Fiscal year
    #[serde(default)]
    pub fy: Option<i32>,
    /// Fiscal period (FY, Q1, ...)
    #[serde(default)]
    pub fp: Option<String>,
    /// Form type
    #[serde(default)]
    pub form: Option<String>,
    /// Filed date
    #[serde(default)]
    pub filed: Option<String>,
}

// =============================================================================
// Extraction
// =============================================================================

/// Extracts one logical metric as a descending, date-unique series.
///
/// Facts are kept when their form matches `period_type` and they carry both an
/// end date and a value. When several facts share an end date the latest filed
/// one is kept. Across candidate tags, the tag whose series reaches the most
/// recent end date wins; ties go to the earlier candidate.
#[must_use]
pub fn extract_metric(
    facts: &CompanyFacts,
    metric: Metric,
    period_type: PeriodType,
    limit: usize,
) -> MetricSeries {
    let mut best: Option<(&str, Vec<MetricPoint>)> = None;

    for &tag in metric_tags(metric) {
        let Some((_, raw)) = facts.tag(tag).and_then(TagFacts::preferred_unit) else {
            continue;
        };
        let points = dedupe_by_end(raw, period_type);
        let Some(latest) = points.first().map(|p| p.end_date) else {
            continue;
        };

        let fresher = best
            .as_ref()
            .and_then(|(_, current)| current.first())
            .is_none_or(|current| latest > current.end_date);
        if fresher {
            best = Some((tag, points));
        }
    }

    match best {
        Some((tag, mut points)) => {
            debug!(%metric, tag, periods = points.len(), "Selected XBRL tag");
            points.truncate(limit);
            MetricSeries { metric, points }
        }
        None => MetricSeries::empty(metric),
    }
}

fn dedupe_by_end(raw: &[RawFact], period_type: PeriodType) -> Vec<MetricPoint> {
    let form = period_type.form();
    let mut points: Vec<MetricPoint> = raw
        .iter()
        .filter(|fact| fact.form.as_deref() == Some(form))
        .filter_map(|fact| {
            let end_date = NaiveDate::parse_from_str(fact.end.as_deref()?, "%Y-%m-%d").ok()?;
            let value = fact.val?;
            let fiscal_year = fact.fy.unwrap_or_else(|| end_date.year());
            let period = period_type
                .label(fiscal_year, fact.fp.as_deref().unwrap_or_default())
                .trim()
                .to_string();
            Some(MetricPoint {
                period,
                end_date,
                value,
                form: form.to_string(),
                filed: fact.filed.clone().unwrap_or_default(),
            })
        })
        .collect();

    points.sort_by(|a, b| {
        b.end_date
            .cmp(&a.end_date)
            .then_with(|| b.filed.cmp(&a.filed))
    });
    points.dedup_by_key(|p| p.end_date);
    points
}
