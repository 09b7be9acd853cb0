//! Reporting period and chart frequency definitions.
//!
//! This module defines [`PeriodType`] for fundamental data periods and the
//! [`ChartRange`] / [`ChartInterval`] pair used for price history.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinError;

/// Period type for fundamental financial data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Annual reporting period (10-K filings).
    #[default]
    Annual,
    /// Quarterly reporting period (10-Q filings).
    Quarterly,
}

impl PeriodType {
    /// The filing form whose facts belong to this period type.
    #[must_use]
    pub const fn form(&self) -> &'static str {
        match self {
            Self::Annual => "10-K",
            Self::Quarterly => "10-Q",
        }
    }

    /// Human label for a reported period, e.g. `FY2023` or `Q2 2024`.
    #[must_use]
    pub fn label(&self, fiscal_year: i32, fiscal_period: &str) -> String {
        match self {
            Self::Annual => format!("FY{fiscal_year}"),
            Self::Quarterly => format!("{fiscal_period} {fiscal_year}"),
        }
    }

    /// Lowercase name as used in tool arguments.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = FinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" => Ok(Self::Annual),
            "quarterly" => Ok(Self::Quarterly),
            other => Err(FinError::InvalidArgument(format!(
                "period must be 'annual' or 'quarterly', got '{other}'"
            ))),
        }
    }
}

/// Time span of a price history request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartRange {
    /// One day.
    #[serde(rename = "1d")]
    OneDay,
    /// Five days.
    #[serde(rename = "5d")]
    FiveDays,
    /// One month.
    #[serde(rename = "1mo")]
    OneMonth,
    /// Three months.
    #[serde(rename = "3mo")]
    ThreeMonths,
    /// Six months.
    #[serde(rename = "6mo")]
    SixMonths,
    /// One year.
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    /// Two years.
    #[serde(rename = "2y")]
    TwoYears,
    /// Five years.
    #[serde(rename = "5y")]
    FiveYears,
    /// Full available history.
    #[serde(rename = "max")]
    Max,
}

impl ChartRange {
    /// Query-string form of the range.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartRange {
    type Err = FinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "1d" => Self::OneDay,
            "5d" => Self::FiveDays,
            "1mo" => Self::OneMonth,
            "3mo" => Self::ThreeMonths,
            "6mo" => Self::SixMonths,
            "1y" => Self::OneYear,
            "2y" => Self::TwoYears,
            "5y" => Self::FiveYears,
            "max" => Self::Max,
            other => {
                return Err(FinError::InvalidArgument(format!(
                    "unsupported period '{other}' (expected 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y or max)"
                )));
            }
        })
    }
}

/// Bar width of a price history request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    /// Daily bars.
    #[default]
    #[serde(rename = "1d")]
    Daily,
    /// Weekly bars.
    #[serde(rename = "1wk")]
    Weekly,
    /// Monthly bars.
    #[serde(rename = "1mo")]
    Monthly,
}

impl ChartInterval {
    /// Query-string form of the interval.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartInterval {
    type Err = FinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1d" => Ok(Self::Daily),
            "1wk" => Ok(Self::Weekly),
            "1mo" => Ok(Self::Monthly),
            other => Err(FinError::InvalidArgument(format!(
                "unsupported interval '{other}' (expected 1d, 1wk or 1mo)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_form_and_label() {
        assert_eq!(PeriodType::Annual.form(), "10-K");
        assert_eq!(PeriodType::Quarterly.form(), "10-Q");
        assert_eq!(PeriodType::Annual.label(2023, "FY"), "FY2023");
        assert_eq!(PeriodType::Quarterly.label(2024, "Q2"), "Q2 2024");
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("Annual".parse::<PeriodType>().unwrap(), PeriodType::Annual);
        assert_eq!(
            "quarterly".parse::<PeriodType>().unwrap(),
            PeriodType::Quarterly
        );
        assert!("monthly".parse::<PeriodType>().is_err());
    }

    #[test]
    fn test_chart_parse() {
        assert_eq!("6mo".parse::<ChartRange>().unwrap(), ChartRange::SixMonths);
        assert_eq!("1wk".parse::<ChartInterval>().unwrap(), ChartInterval::Weekly);
        assert!("10y".parse::<ChartRange>().is_err());
        assert!("1h".parse::<ChartInterval>().is_err());
        assert_eq!(ChartRange::default().as_str(), "1y");
        assert_eq!(ChartInterval::default().as_str(), "1d");
    }

    #[test]
    fn test_serde_names() {
        let range: ChartRange = serde_json::from_str("\"max\"").unwrap();
        assert_eq!(range, ChartRange::Max);
        let period: PeriodType = serde_json::from_str("\"quarterly\"").unwrap();
        assert_eq!(period, PeriodType::Quarterly);
    }
}
