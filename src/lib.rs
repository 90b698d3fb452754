// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Adobe Analytics Reports client
//!
//! A client for the Adobe Analytics Reports API v2 that builds report
//! queries programmatically, walks paginated results, and synthesizes
//! multi-dimension breakdown reports the API does not return in one call.
//!
//! ## Features
//!
//! - **JWT authentication**: service-account JWT exchange against Adobe IMS
//!   with token caching
//! - **Paged retrieval**: walks `settings.page` until the API reports the
//!   last page
//! - **Breakdown synthesis**: re-queries once per parent dimension value and
//!   merges children onto their ancestor path
//! - **Rate limiting**: token-bucket limiter plus 429 retry inside the
//!   vendor's request budget
//! - **Tabular output**: flat tables convertible to JSON records, Arrow
//!   RecordBatches and Parquet files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use adobe_reports::{AnalyticsClient, ClientConfig, load_definition, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let client = AnalyticsClient::new(config)?;
//!
//!     // Verify credentials
//!     client.check().await?;
//!
//!     // Run a report described in YAML
//!     let definition = load_definition("reports/devices-by-channel.yaml")?;
//!     let table = client.run_definition(&definition).await?;
//!
//!     for record in table.to_records() {
//!         println!("{record}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       AnalyticsClient                           │
//! │  check() → ()      run_report(req) → ReportTable                │
//! │  run_breakdown_report(req, dims) → ReportTable                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │ Breakdown │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ JWT      │ POST      │ settings.page │ itemId    │ JSON        │
//! │ Exchange │ Retry     │ lastPage      │ filters   │ Arrow       │
//! │ Caching  │ Rate Limit│ totalPages    │ per-level │ Parquet     │
//! │          │ Backoff   │               │ merge     │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Add docs before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client credentials and endpoints
pub mod config;

/// JWT token exchange against Adobe IMS
pub mod auth;

/// HTTP transport with retry and rate limiting
pub mod http;

/// Report request and response models
pub mod report;

/// Paginated report retrieval
pub mod pagination;

/// Breakdown report synthesis
pub mod breakdown;

/// Tabular report output
pub mod output;

/// YAML report definitions
pub mod loader;

/// Analytics client facade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::AnalyticsClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use loader::{load_definition, load_definition_from_str, ReportDefinition};
pub use output::ReportTable;
pub use report::ReportRequest;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
