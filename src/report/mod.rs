//! Report request and response models
//!
//! A typed rendition of the reporting API's report object and its response.
//! The request starts from the canonical empty shape and is mutated through
//! builder-style operations (metrics, dimension, date range, settings,
//! breakdown filters).

mod request;
mod response;


pub use request::{
    format_date_range, GlobalFilter, Metric, MetricContainer, MetricFilter, ReportRequest,
    Settings, BREAKDOWN_FILTER_TYPE, DATE_RANGE_FILTER_TYPE,
};
pub use response::{DimensionColumn, ReportColumns, ReportResponse, ReportRow, SummaryData};
