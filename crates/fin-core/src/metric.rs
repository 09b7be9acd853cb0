//! Logical metric vocabulary.
//!
//! A [`Metric`] is a normalized name (e.g. `revenue`) that providers map onto
//! their own concrete identifiers. A [`DerivedMetric`] is computed from one or
//! more extracted metrics rather than read from a filing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinError;

/// Normalized financial metric that can be requested from a fundamentals provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Total revenue.
    Revenue,
    /// Net income (loss).
    NetIncome,
    /// Operating income plus depreciation and amortization. Derived only.
    Ebitda,
    /// Operating income (loss).
    OperatingIncome,
    /// Total assets.
    TotalAssets,
    /// Total liabilities.
    TotalLiabilities,
    /// Stockholders' equity.
    StockholdersEquity,
    /// Cash and equivalents.
    Cash,
    /// Total debt.
    TotalDebt,
    /// Depreciation, depletion and amortization.
    Depreciation,
    /// Cost of revenue.
    CostOfRevenue,
    /// Gross profit.
    GrossProfit,
    /// Earnings per share.
    Eps,
    /// Shares outstanding.
    SharesOutstanding,
}

impl Metric {
    /// Every supported metric, in display order.
    pub const ALL: [Self; 14] = [
        Self::Revenue,
        Self::NetIncome,
        Self::Ebitda,
        Self::OperatingIncome,
        Self::TotalAssets,
        Self::TotalLiabilities,
        Self::StockholdersEquity,
        Self::Cash,
        Self::TotalDebt,
        Self::Depreciation,
        Self::CostOfRevenue,
        Self::GrossProfit,
        Self::Eps,
        Self::SharesOutstanding,
    ];

    /// Default selection for a single-company financials request.
    pub const DEFAULT_FINANCIALS: [Self; 4] = [
        Self::Revenue,
        Self::NetIncome,
        Self::TotalAssets,
        Self::StockholdersEquity,
    ];

    /// Default selection for comparison and benchmark requests.
    pub const DEFAULT_PEER: [Self; 3] = [Self::Revenue, Self::NetIncome, Self::TotalAssets];

    /// The snake_case name used in tool arguments and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::NetIncome => "net_income",
            Self::Ebitda => "ebitda",
            Self::OperatingIncome => "operating_income",
            Self::TotalAssets => "total_assets",
            Self::TotalLiabilities => "total_liabilities",
            Self::StockholdersEquity => "stockholders_equity",
            Self::Cash => "cash",
            Self::TotalDebt => "total_debt",
            Self::Depreciation => "depreciation",
            Self::CostOfRevenue => "cost_of_revenue",
            Self::GrossProfit => "gross_profit",
            Self::Eps => "eps",
            Self::SharesOutstanding => "shares_outstanding",
        }
    }

    /// True when the metric is only ever computed, never extracted.
    #[must_use]
    pub const fn is_derived_only(&self) -> bool {
        matches!(self, Self::Ebitda)
    }

    /// Comma-separated list of valid names, for error messages and tool help.
    #[must_use]
    pub fn options() -> String {
        Self::ALL
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = FinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                FinError::InvalidArgument(format!(
                    "unknown metric '{s}'. Options: {}",
                    Self::options()
                ))
            })
    }
}

/// Metric computed from other metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedMetric {
    /// `operating_income + depreciation`.
    Ebitda,
    /// Period-over-period revenue growth in percent.
    RevenueGrowthPct,
    /// `gross_profit / revenue * 100`.
    GrossMarginPct,
    /// `net_income / revenue * 100`.
    NetMarginPct,
}

impl DerivedMetric {
    /// The snake_case name used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ebitda => "ebitda",
            Self::RevenueGrowthPct => "revenue_growth_pct",
            Self::GrossMarginPct => "gross_margin_pct",
            Self::NetMarginPct => "net_margin_pct",
        }
    }

    /// True when values are percentages rather than currency amounts.
    #[must_use]
    pub const fn is_percentage(&self) -> bool {
        !matches!(self, Self::Ebitda)
    }
}

impl fmt::Display for DerivedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_round_trip_through_parse() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_metric_parse_is_case_insensitive() {
        assert_eq!(" Net_Income ".parse::<Metric>().unwrap(), Metric::NetIncome);
    }

    #[test]
    fn test_unknown_metric_lists_options() {
        let err = "ebit".parse::<Metric>().unwrap_err();
        match err {
            FinError::InvalidArgument(msg) => {
                assert!(msg.contains("ebit"));
                assert!(msg.contains("shares_outstanding"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_derived_flags() {
        assert!(Metric::Ebitda.is_derived_only());
        assert!(!Metric::Revenue.is_derived_only());
        assert!(!DerivedMetric::Ebitda.is_percentage());
        assert!(DerivedMetric::NetMarginPct.is_percentage());
    }

    #[test]
    fn test_serde_snake_case() {
        let metric: Metric = serde_json::from_str("\"cost_of_revenue\"").unwrap();
        assert_eq!(metric, Metric::CostOfRevenue);
        assert_eq!(
            serde_json::to_string(&DerivedMetric::GrossMarginPct).unwrap(),
            "\"gross_margin_pct\""
        );
    }
}
