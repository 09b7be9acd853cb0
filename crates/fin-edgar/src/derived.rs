//! Derived metrics computed from extracted series.
//!
//! Every derivation aligns operands on exact period-end dates and yields a
//! `None` value where an operand is missing or a divisor is zero. A derivation
//! runs only when its base metrics were requested.

use fin_core::{DerivedMetric, DerivedPoint, DerivedSeries, Metric, MetricSeries, PeriodType};

use crate::xbrl::{CompanyFacts, extract_metric};

/// `operating_income + depreciation`, one point per operating-income period.
#[must_use]
pub fn ebitda(operating_income: &MetricSeries, depreciation: &MetricSeries) -> DerivedSeries {
    DerivedSeries {
        metric: DerivedMetric::Ebitda,
        points: operating_income
            .points
            .iter()
            .map(|oi| DerivedPoint {
                period: oi.period.clone(),
                end_date: oi.end_date,
                value: depreciation.at(oi.end_date).map(|d| oi.value + d.value),
            })
            .collect(),
    }
}

/// Period-over-period growth of a descending revenue series, in percent.
///
/// Returns `None` when fewer than two periods are available.
#[must_use]
pub fn revenue_growth(revenue: &MetricSeries) -> Option<DerivedSeries> {
    if revenue.points.len() < 2 {
        return None;
    }
    let points = revenue
        .points
        .windows(2)
        .map(|pair| {
            let (current, prior) = (&pair[0], &pair[1]);
            DerivedPoint {
                period: current.period.clone(),
                end_date: current.end_date,
                value: (prior.value != 0.0)
                    .then(|| (current.value - prior.value) / prior.value.abs() * 100.0),
            }
        })
        .collect();
    Some(DerivedSeries {
        metric: DerivedMetric::RevenueGrowthPct,
        points,
    })
}

/// `numerator / revenue * 100`, one point per numerator period.
#[must_use]
pub fn margin(
    metric: DerivedMetric,
    numerator: &MetricSeries,
    revenue: &MetricSeries,
) -> DerivedSeries {
    DerivedSeries {
        metric,
        points: numerator
            .points
            .iter()
            .map(|n| DerivedPoint {
                period: n.period.clone(),
                end_date: n.end_date,
                value: revenue
                    .at(n.end_date)
                    .filter(|r| r.value != 0.0)
                    .map(|r| n.value / r.value * 100.0),
            })
            .collect(),
    }
}

/// Runs every derivation the request allows.
///
/// `extracted` holds the series already extracted for `requested`. EBITDA
/// operands are extracted from `facts` when they were not requested directly.
#[must_use]
pub fn derive_all(
    facts: &CompanyFacts,
    requested: &[Metric],
    extracted: &[MetricSeries],
    period_type: PeriodType,
    limit: usize,
) -> Vec<DerivedSeries> {
    let find = |metric: Metric| extracted.iter().find(|s| s.metric == metric);
    let mut derived = Vec::new();

    if requested.contains(&Metric::Ebitda) {
        let operand = |metric| {
            find(metric)
                .cloned()
                .unwrap_or_else(|| extract_metric(facts, metric, period_type, limit))
        };
        derived.push(ebitda(
            &operand(Metric::OperatingIncome),
            &operand(Metric::Depreciation),
        ));
    }

    let revenue = find(Metric::Revenue);
    if let Some(growth) = revenue.and_then(revenue_growth) {
        derived.push(growth);
    }
    if let (Some(gross), Some(revenue)) = (find(Metric::GrossProfit), revenue) {
        derived.push(margin(DerivedMetric::GrossMarginPct, gross, revenue));
    }
    if let (Some(net), Some(revenue)) = (find(Metric::NetIncome), revenue) {
        derived.push(margin(DerivedMetric::NetMarginPct, net, revenue));
    }

    derived
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use fin_core::MetricPoint;

    fn series(metric: Metric, values: &[(i32, f64)]) -> MetricSeries {
        MetricSeries {
            metric,
            points: values
                .iter()
                .map(|&(year, value)| MetricPoint {
                    period: format!("FY{year}"),
                    end_date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
                    value,
                    form: "10-K".into(),
                    filed: format!("{}-02-15", year + 1),
                })
                .collect(),
        }
    }

    fn round2(v: f64) -> f64 {
        (v * 100.0).round() / 100.0
    }

    #[test]
    fn test_revenue_growth() {
        let revenue = series(Metric::Revenue, &[(2023, 120.0), (2022, 100.0), (2021, 90.0)]);
        let growth = revenue_growth(&revenue).unwrap();

        assert_eq!(growth.points.len(), 2);
        let values: Vec<f64> = growth.points.iter().map(|p| round2(p.value.unwrap())).collect();
        assert_eq!(values, vec![20.0, 11.11]);
        assert_eq!(growth.points[0].period, "FY2023");
    }

    #[test]
    fn test_revenue_growth_zero_prior_and_short_series() {
        let revenue = series(Metric::Revenue, &[(2023, 50.0), (2022, 0.0), (2021, -10.0)]);
        let growth = revenue_growth(&revenue).unwrap();
        assert_eq!(growth.points[0].value, None);
        assert_relative_eq!(growth.points[1].value.unwrap(), 100.0);

        assert!(revenue_growth(&series(Metric::Revenue, &[(2023, 1.0)])).is_none());
    }

    #[test]
    fn test_margin_zero_revenue_is_none() {
        let gross = series(Metric::GrossProfit, &[(2023, 30.0)]);
        let revenue = series(Metric::Revenue, &[(2023, 0.0)]);
        let m = margin(DerivedMetric::GrossMarginPct, &gross, &revenue);
        assert_eq!(m.points.len(), 1);
        assert_eq!(m.points[0].value, None);
    }

    #[test]
    fn test_margin_aligns_on_dates() {
        let net = series(Metric::NetIncome, &[(2023, 25.0), (2022, 10.0)]);
        let revenue = series(Metric::Revenue, &[(2023, 100.0)]);
        let m = margin(DerivedMetric::NetMarginPct, &net, &revenue);
        assert_relative_eq!(m.points[0].value.unwrap(), 25.0);
        assert_eq!(m.points[1].value, None);
    }

    #[test]
    fn test_ebitda_nullable_depreciation() {
        let op = series(Metric::OperatingIncome, &[(2023, 100.0), (2022, 80.0)]);
        let dep = series(Metric::Depreciation, &[(2023, 15.0)]);
        let e = ebitda(&op, &dep);
        assert_eq!(e.points.len(), 2);
        assert_relative_eq!(e.points[0].value.unwrap(), 115.0);
        assert_eq!(e.points[1].value, None);
    }

    #[test]
    fn test_derive_all_respects_request() {
        let revenue = series(Metric::Revenue, &[(2023, 120.0), (2022, 100.0)]);
        let net = series(Metric::NetIncome, &[(2023, 12.0)]);
        let extracted = vec![revenue, net];
        let requested = [Metric::Revenue, Metric::NetIncome];

        let derived = derive_all(
            &CompanyFacts::default(),
            &requested,
            &extracted,
            PeriodType::Annual,
            5,
        );
        let names: Vec<_> = derived.iter().map(|d| d.metric).collect();
        assert_eq!(
            names,
            vec![DerivedMetric::RevenueGrowthPct, DerivedMetric::NetMarginPct]
        );
    }

    #[test]
    fn test_derive_all_ebitda_without_operands_is_empty_series() {
        let derived = derive_all(
            &CompanyFacts::default(),
            &[Metric::Ebitda],
            &[],
            PeriodType::Annual,
            5,
        );
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].metric, DerivedMetric::Ebitda);
        assert!(derived[0].points.is_empty());
    }
}
