//! Distributional summaries over peer values.

use serde::{Deserialize, Serialize};

/// Summary statistics for one metric across a peer set.
///
/// Every field is `None` when no peer supplied a value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    /// Number of values summarized.
    pub count: usize,
    /// Median.
    pub median: Option<f64>,
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// 25th percentile (nearest rank).
    pub p25: Option<f64>,
    /// 75th percentile (nearest rank).
    pub p75: Option<f64>,
    /// Smallest value.
    pub min: Option<f64>,
    /// Largest value.
    pub max: Option<f64>,
}

/// Summarizes `values`.
///
/// Quartiles take the element at `floor(n * 0.25)` and `floor(n * 0.75)` of the
/// ascending sort, without interpolation. NaNs sort last.
#[must_use]
pub fn summarize(values: &[f64]) -> BenchmarkSummary {
    if values.is_empty() {
        return BenchmarkSummary::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mid = n / 2;
    let median = if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let rank = |q: f64| sorted[((n as f64 * q).floor() as usize).min(n - 1)];

    BenchmarkSummary {
        count: n,
        median: Some(median),
        mean: Some(mean),
        p25: Some(rank(0.25)),
        p75: Some(rank(0.75)),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
    }
}
