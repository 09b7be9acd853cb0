//! Value formatting shared by the markdown reports.

use fin_core::{DerivedMetric, Metric};

/// Placeholder for a missing value.
pub const MISSING: &str = "—";

fn scaled(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (abs / 1e9, "B")
    } else if abs >= 1e6 {
        (abs / 1e6, "M")
    } else if abs >= 1e3 {
        (abs / 1e3, "K")
    } else {
        (abs, "")
    };
    format!("{scaled:.2}{suffix}")
}

/// Dollar amount scaled to B/M/K with two decimals, e.g. `$383.29B`.
#[must_use]
pub fn currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", scaled(value))
}

/// Market capitalization, which also scales to trillions.
#[must_use]
pub fn market_cap(value: f64) -> String {
    if value.abs() >= 1e12 {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{sign}${:.2}T", value.abs() / 1e12)
    } else {
        currency(value)
    }
}

/// Percentage with one decimal, e.g. `38.3%`.
#[must_use]
pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Signed number with two decimals, e.g. `+1.25` or `-0.40`.
#[must_use]
pub fn signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

/// Integer with thousands separators, e.g. `52,164,502`.
#[must_use]
pub fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Decimal with thousands separators and at most three fraction digits,
/// trailing zeros dropped, e.g. `27,956.998`.
#[must_use]
pub fn decimal(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    let int = int.parse::<u64>().map_or_else(|_| int.to_string(), grouped);
    if frac.is_empty() {
        format!("{sign}{int}")
    } else {
        format!("{sign}{int}.{frac}")
    }
}

/// Formats an extracted metric value; share counts carry no currency sign.
#[must_use]
pub fn metric_value(metric: Metric, value: Option<f64>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(v) if metric == Metric::SharesOutstanding => scaled(v),
        Some(v) => currency(v),
    }
}

/// Formats a derived metric value as a percentage or a dollar amount.
#[must_use]
pub fn derived_value(metric: DerivedMetric, value: Option<f64>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(v) if metric.is_percentage() => percent(v),
        Some(v) => currency(v),
    }
}

/// Escapes `|` so free text cannot break a markdown table row.
#[must_use]
pub fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}
