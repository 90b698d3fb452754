//! Report definition types

use crate::report::ReportRequest;
use crate::types::SortOrder;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A report query described in YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDefinition {
    /// Report suite id
    pub report_suite_id: String,

    /// Reporting window (end date inclusive)
    pub date_range: DateRange,

    /// Metric ids, e.g. `metrics/visits`
    pub metrics: Vec<String>,

    /// Ordered dimension list; entries beyond the first become breakdown
    /// levels
    pub dimensions: Vec<String>,

    /// Rows per page
    #[serde(default)]
    pub limit: Option<u32>,

    /// Dimension sort order
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

/// A calendar-date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the window
    pub start: NaiveDate,
    /// Last day of the window (inclusive)
    pub end: NaiveDate,
}

impl ReportDefinition {
    /// Build the base report request for this definition
    ///
    /// The request carries the first dimension; the full dimension list
    /// drives the breakdown expander.
    pub fn to_request(&self) -> ReportRequest {
        let mut request = ReportRequest::for_suite(&self.report_suite_id);

        for metric in &self.metrics {
            request.add_metric(metric);
        }

        if let Some(first) = self.dimensions.first() {
            request.set_dimension(first, self.sort.unwrap_or_default());
        }

        request.set_date_range(self.date_range.start, self.date_range.end);

        if let Some(limit) = self.limit {
            request.set_limit(limit);
        }

        request
    }

    /// Whether this definition needs breakdown expansion
    pub fn has_breakdowns(&self) -> bool {
        self.dimensions.len() > 1
    }
}
