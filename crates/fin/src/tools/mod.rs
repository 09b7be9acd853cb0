//! Tool pipelines.
//!
//! Each pipeline validates its request, calls one provider capability and
//! returns a report that renders as markdown through `Display`. Pipelines
//! depend only on the provider traits.

mod benchmark;
mod compare;
mod earnings;
mod filing;
mod financials;
mod indicators;
mod stock;

#[cfg(test)]
pub(crate) mod testing;

pub use benchmark::{BenchmarkReport, industry_benchmarks};
pub use compare::{ComparisonReport, compare_companies};
pub use earnings::{EarningsReport, earnings_releases};
pub use filing::{DocumentText, FetchedFiling, FilingTextReport, filing_text};
pub use financials::{FinancialsReport, company_financials};
pub use indicators::{MacroReport, NOTES_CHARS, macro_indicators};
pub use stock::{PeriodStats, RECENT_POINTS, StockReport, stock_data};
