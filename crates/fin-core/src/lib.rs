#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the financial intelligence providers.
//!
//! This crate provides the foundational abstractions shared by every provider:
//!
//! - [`DataProvider`](provider::DataProvider) - Base trait for all providers
//! - [`FundamentalDataProvider`](provider::FundamentalDataProvider) - Company info, metrics, peers
//! - [`FilingDataProvider`](provider::FilingDataProvider) - Filings and document text
//! - [`PriceDataProvider`](provider::PriceDataProvider) - Quote and price history
//! - [`MacroDataProvider`](provider::MacroDataProvider) - Macroeconomic series
//! - [`RateLimiter`](rate_limit::RateLimiter) - Per-provider request pacing
//! - [`summarize`](stats::summarize) - Peer benchmark statistics

/// Per-entity outcomes for multi-company requests.
pub mod batch;
/// Error types for provider and pipeline operations.
pub mod error;
/// Reporting period and chart frequency definitions.
pub mod frequency;
/// Logical and derived metric names.
pub mod metric;
/// Provider traits for fetching financial data.
pub mod provider;
/// Fixed-interval request pacing.
pub mod rate_limit;
/// Distributional summaries over peer values.
pub mod stats;
/// Core value types (Symbol, Cik, MetricSeries, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use batch::{Batch, Outcome};
pub use error::{FinError, Result};
pub use frequency::{ChartInterval, ChartRange, PeriodType};
pub use metric::{DerivedMetric, Metric};
pub use provider::{
    DataProvider, FilingDataProvider, FundamentalDataProvider, MacroDataProvider,
    PriceDataProvider,
};
pub use rate_limit::{MIN_RATE, RateLimiter};
pub use stats::{BenchmarkSummary, summarize};
pub use types::{
    Cik, CompanyFinancials, CompanyInfo, DerivedPoint, DerivedSeries, FilingDocument, FilingForm,
    FilingInfo, MacroIndicatorData, MetricPoint, MetricSeries, Observation, ObservationQuery,
    PricePoint, SeriesInfo, StockData, StockQuote, Symbol,
};
