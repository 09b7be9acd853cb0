#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial intelligence over SEC EDGAR, FRED and Yahoo Finance.
//!
//! This crate re-exports the core types and provider implementations, and
//! provides [`FinancialIntelligence`], which runs the tool pipelines against
//! one provider per capability.
//!
//! # Example
//!
//! ```rust,ignore
//! use fin::{FinConfig, FinancialIntelligence, BenchmarkRequest, IndustrySelector};
//!
//! #[tokio::main]
//! async fn main() -> fin::Result<()> {
//!     let config = FinConfig::new("MyApp/1.0 (me@example.com)");
//!     let service = FinancialIntelligence::from_config(&config)?;
//!
//!     let request = BenchmarkRequest::new(IndustrySelector::Sic("7372".into()));
//!     let report = service.industry_benchmarks(&request).await?;
//!     println!("{report}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use fin_core::*;

// Providers
pub use fin_edgar::EdgarProvider;
pub use fin_fred::FredProvider;
pub use fin_yahoo::YahooProvider;

mod config;
pub use config::{FinConfig, ProviderSettings};

/// Markdown value formatting.
pub mod format;

mod registry;
pub use registry::FinancialIntelligence;

/// Validated tool requests.
pub mod request;
pub use request::{
    BenchmarkRequest, CompareRequest, EarningsRequest, FilingTextRequest, FinancialsRequest,
    IndustrySelector, MacroRequest, StockRequest,
};

/// Tool pipelines and their reports.
pub mod tools;
pub use tools::{
    BenchmarkReport, ComparisonReport, EarningsReport, FilingTextReport, FinancialsReport,
    MacroReport, StockReport,
};
