//! Report request model and builder operations

use crate::error::{Error, Result};
use crate::types::SortOrder;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Filter type for the global date range filter
pub const DATE_RANGE_FILTER_TYPE: &str = "dateRange";

/// Filter type for itemId-scoped breakdown metric filters
pub const BREAKDOWN_FILTER_TYPE: &str = "breakdown";

/// A report query against one report suite
///
/// Serializes to the exact JSON shape the reports endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Report suite id
    pub rsid: String,

    /// Global filters; a single date-range filter in practice
    #[serde(rename = "globalFilters")]
    pub global_filters: Vec<GlobalFilter>,

    /// Requested metrics and their filters
    #[serde(rename = "metricContainer")]
    pub metric_container: MetricContainer,

    /// The single dimension this request breaks metrics down by
    pub dimension: String,

    /// Paging and sort settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

impl ReportRequest {
    /// The canonical empty report object
    pub fn new() -> Self {
        Self {
            rsid: String::new(),
            global_filters: vec![GlobalFilter {
                kind: DATE_RANGE_FILTER_TYPE.to_string(),
                date_range: String::new(),
            }],
            metric_container: MetricContainer::default(),
            dimension: String::new(),
            settings: None,
        }
    }

    /// Create an empty request for the given report suite
    pub fn for_suite(rsid: impl Into<String>) -> Self {
        let mut request = Self::new();
        request.rsid = rsid.into();
        request
    }

    /// Set the report suite id
    pub fn set_report_suite(&mut self, rsid: impl Into<String>) {
        self.rsid = rsid.into();
    }

    /// Add a metric; the column id is the running index of the metric list
    pub fn add_metric(&mut self, id: impl Into<String>) {
        let column_id = self.metric_container.metrics.len().to_string();
        self.metric_container.metrics.push(Metric {
            column_id,
            id: id.into(),
            filters: Vec::new(),
        });
    }

    /// Set the dimension and its sort order
    pub fn set_dimension(&mut self, dimension: impl Into<String>, sort: SortOrder) {
        self.dimension = dimension.into();
        self.settings_mut().dimension_sort = Some(sort);
    }

    /// Set the reporting window; `end` is inclusive as a calendar date
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let formatted = format_date_range(start, end);
        if let Some(filter) = self
            .global_filters
            .iter_mut()
            .find(|f| f.kind == DATE_RANGE_FILTER_TYPE)
        {
            filter.date_range = formatted;
        } else {
            self.global_filters.push(GlobalFilter {
                kind: DATE_RANGE_FILTER_TYPE.to_string(),
                date_range: formatted,
            });
        }
    }

    /// Set the per-page row limit
    pub fn set_limit(&mut self, limit: u32) {
        self.settings_mut().limit = Some(limit);
    }

    /// Set the requested page number (zero-based)
    pub fn set_page(&mut self, page: u32) {
        self.settings_mut().page = Some(page);
    }

    /// Attach an itemId-scoped breakdown filter and reference it from every
    /// metric
    ///
    /// Filter ids are the running index of the filter list, so one request
    /// carries a dense `"0".."n"` id range regardless of breakdown depth.
    pub fn add_breakdown_filter(&mut self, dimension: impl Into<String>, item_id: impl Into<String>) {
        let id = self.metric_container.metric_filters.len().to_string();
        self.metric_container.metric_filters.push(MetricFilter {
            id: id.clone(),
            kind: BREAKDOWN_FILTER_TYPE.to_string(),
            dimension: dimension.into(),
            item_id: item_id.into(),
        });
        for metric in &mut self.metric_container.metrics {
            metric.filters.push(id.clone());
        }
    }

    /// Lookup table from column id to metric id, used to name output columns
    pub fn metric_names(&self) -> HashMap<String, String> {
        self.metric_container
            .metrics
            .iter()
            .map(|m| (m.column_id.clone(), m.id.clone()))
            .collect()
    }

    /// Metric ids in insertion order
    pub fn metric_ids(&self) -> Vec<String> {
        self.metric_container
            .metrics
            .iter()
            .map(|m| m.id.clone())
            .collect()
    }

    /// Validate that the request can be sent
    pub fn validate(&self) -> Result<()> {
        if self.rsid.is_empty() {
            return Err(Error::report("report suite id is empty"));
        }
        if self.dimension.is_empty() {
            return Err(Error::report("dimension is empty"));
        }
        if self.metric_container.metrics.is_empty() {
            return Err(Error::report("no metrics requested"));
        }
        if self
            .global_filters
            .iter()
            .all(|f| f.kind != DATE_RANGE_FILTER_TYPE || f.date_range.is_empty())
        {
            return Err(Error::report("date range is not set"));
        }
        Ok(())
    }

    fn settings_mut(&mut self) -> &mut Settings {
        self.settings.get_or_insert_with(Settings::default)
    }
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// A global report filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalFilter {
    /// Filter type (`dateRange`)
    #[serde(rename = "type")]
    pub kind: String,
    /// `start/end` timestamp pair
    #[serde(rename = "dateRange")]
    pub date_range: String,
}

/// The metric list plus any itemId-scoped filters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricContainer {
    /// Requested metrics
    pub metrics: Vec<Metric>,
    /// Breakdown filters referenced by the metrics
    #[serde(
        rename = "metricFilters",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub metric_filters: Vec<MetricFilter>,
}

/// One requested metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Column id; position of this metric's values in each row's data array
    #[serde(rename = "columnId")]
    pub column_id: String,
    /// Metric id, e.g. `metrics/visits`
    pub id: String,
    /// Ids of the metric filters applied to this metric
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

/// An itemId-scoped breakdown filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFilter {
    /// Filter id referenced from `Metric::filters`
    pub id: String,
    /// Filter type (`breakdown`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Parent dimension being broken down
    pub dimension: String,
    /// Item id of the parent dimension value
    #[serde(rename = "itemId")]
    pub item_id: String,
}

/// Paging and sort settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Zero-based page number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Rows per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Dimension sort order
    #[serde(rename = "dimensionSort", skip_serializing_if = "Option::is_none")]
    pub dimension_sort: Option<SortOrder>,
}

/// Format a calendar-date window into the API's timestamp-pair form
///
/// The window starts at midnight of `start` and ends exclusively at midnight
/// of the day after `end`, so a same-day range covers the full day:
/// `2020-01-31T00:00:00/2020-02-01T00:00:00`.
pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
    let start_ts = start.and_hms_opt(0, 0, 0).unwrap();
    let end_ts = (end + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap();
    format!("{}/{}", start_ts.format(FORMAT), end_ts.format(FORMAT))
}
