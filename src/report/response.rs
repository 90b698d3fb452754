//! Report response model

use serde::{Deserialize, Serialize};

/// One page of a report response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    /// Total number of pages for this query
    #[serde(default)]
    pub total_pages: u32,

    /// Whether this is the first page
    #[serde(default)]
    pub first_page: bool,

    /// Whether this is the last page
    #[serde(default)]
    pub last_page: bool,

    /// Rows on this page
    #[serde(default)]
    pub number_of_elements: u64,

    /// Zero-based page number of this page
    #[serde(default)]
    pub number: u32,

    /// Total rows across all pages
    #[serde(default)]
    pub total_elements: u64,

    /// Dimension and metric column descriptors
    pub columns: ReportColumns,

    /// Result rows
    #[serde(default)]
    pub rows: Vec<ReportRow>,

    /// Report-level totals
    #[serde(default)]
    pub summary_data: Option<SummaryData>,
}

impl ReportResponse {
    /// True when the query matched nothing at all
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }
}

/// Column descriptors for a response page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportColumns {
    /// The dimension the rows are keyed by
    pub dimension: DimensionColumn,

    /// Column ids in data-array order; each maps back to a requested metric
    #[serde(default)]
    pub column_ids: Vec<String>,
}

/// The dimension column descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionColumn {
    /// Dimension id, e.g. `variables/daterangeday`
    pub id: String,
    /// Dimension value type reported by the API
    #[serde(rename = "type")]
    pub kind: String,
}

/// One dimension value and its metric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// Stable identifier for this dimension value; breakdown filters key on it
    pub item_id: String,

    /// Human-readable dimension value
    pub value: String,

    /// Metric values in `columnIds` order
    #[serde(default)]
    pub data: Vec<f64>,
}

/// Report-level totals
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    /// Totals per metric
    #[serde(default)]
    pub totals: Vec<f64>,

    /// Totals after filters, when the API reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_totals: Option<Vec<f64>>,
}
