//! Flat report table

use crate::error::Result;
use crate::pagination::PagedReport;
use crate::report::{ReportRequest, ReportRow};
use crate::types::JsonValue;
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::sync::Arc;

/// Item id used for the placeholder row of an empty report
pub const PLACEHOLDER_ITEM_ID: &str = "0";

/// Dimension value used for the placeholder row of an empty report
pub const PLACEHOLDER_VALUE: &str = "Unspecified";

/// A flat report table
///
/// One dimension column per breakdown level plus one column per requested
/// metric. Row order follows the API's response order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    /// Dimension column names, outermost level first
    pub dimensions: Vec<String>,
    /// Metric column names in request order
    pub metrics: Vec<String>,
    /// Table rows
    pub rows: Vec<TableRow>,
}

/// One table row
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Item id per dimension level
    pub item_ids: Vec<String>,
    /// Dimension value per level
    pub values: Vec<String>,
    /// Metric values in metric-column order
    pub metrics: Vec<f64>,
}

impl ReportTable {
    /// Create an empty table with the given columns
    pub fn new(dimensions: Vec<String>, metrics: Vec<String>) -> Self {
        Self {
            dimensions,
            metrics,
            rows: Vec::new(),
        }
    }

    /// Build a single-dimension table from all pages of one query
    ///
    /// An empty result set produces one placeholder row so downstream
    /// consumers always see the full column set.
    pub fn from_paged(request: &ReportRequest, paged: &PagedReport) -> Self {
        let mut table = Self::new(vec![request.dimension.clone()], request.metric_ids());

        let names = request.metric_names();
        for response in &paged.responses {
            for row in &response.rows {
                let metrics =
                    order_metric_values(row, &response.columns.column_ids, &names, &table.metrics);
                table.rows.push(TableRow {
                    item_ids: vec![row.item_id.clone()],
                    values: vec![row.value.clone()],
                    metrics,
                });
            }
        }

        if table.rows.is_empty() {
            table.push_placeholder_row();
        }

        table
    }

    /// Append the placeholder row for an empty result set
    pub fn push_placeholder_row(&mut self) {
        let levels = self.dimensions.len();
        self.rows.push(TableRow {
            item_ids: vec![PLACEHOLDER_ITEM_ID.to_string(); levels],
            values: vec![PLACEHOLDER_VALUE.to_string(); levels],
            metrics: vec![0.0; self.metrics.len()],
        });
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All column names: leaf item id, dimensions, then metrics
    pub fn column_names(&self) -> Vec<String> {
        let mut names = vec!["itemId".to_string()];
        names.extend(self.dimensions.iter().cloned());
        names.extend(self.metrics.iter().cloned());
        names
    }

    /// Convert to JSON records, one object per row
    pub fn to_records(&self) -> Vec<JsonValue> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = serde_json::Map::new();
                record.insert(
                    "itemId".to_string(),
                    JsonValue::String(row.item_ids.last().cloned().unwrap_or_default()),
                );
                for (dim, value) in self.dimensions.iter().zip(&row.values) {
                    record.insert(dim.clone(), JsonValue::String(value.clone()));
                }
                for (metric, value) in self.metrics.iter().zip(&row.metrics) {
                    record.insert(
                        metric.clone(),
                        serde_json::Number::from_f64(*value)
                            .map_or(JsonValue::Null, JsonValue::Number),
                    );
                }
                JsonValue::Object(record)
            })
            .collect()
    }

    /// Arrow schema for this table
    pub fn schema(&self) -> Schema {
        let mut fields = vec![Field::new("itemId", DataType::Utf8, false)];
        for dim in &self.dimensions {
            fields.push(Field::new(dim, DataType::Utf8, false));
        }
        for metric in &self.metrics {
            fields.push(Field::new(metric, DataType::Float64, true));
        }
        Schema::new(fields)
    }

    /// Convert to an Arrow RecordBatch
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = Arc::new(self.schema());

        if self.rows.is_empty() {
            return Ok(RecordBatch::new_empty(schema));
        }

        let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

        let leaf_ids: StringArray = self
            .rows
            .iter()
            .map(|row| row.item_ids.last().cloned())
            .collect();
        columns.push(Arc::new(leaf_ids));

        for level in 0..self.dimensions.len() {
            let values: StringArray = self
                .rows
                .iter()
                .map(|row| row.values.get(level).cloned())
                .collect();
            columns.push(Arc::new(values));
        }

        for idx in 0..self.metrics.len() {
            let values: Float64Array = self
                .rows
                .iter()
                .map(|row| row.metrics.get(idx).copied())
                .collect();
            columns.push(Arc::new(values));
        }

        RecordBatch::try_new(schema, columns).map_err(Into::into)
    }

    /// Render an aligned plain-text table
    pub fn render_text(&self) -> String {
        let headers = self.column_names();
        let mut cells: Vec<Vec<String>> = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let mut line = vec![row.item_ids.last().cloned().unwrap_or_default()];
            line.extend(row.values.iter().cloned());
            line.extend(row.metrics.iter().map(|m| format_metric(*m)));
            cells.push(line);
        }

        let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
        for line in &cells {
            for (i, cell) in line.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        let mut out = String::new();
        render_line(&mut out, &headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        render_line(&mut out, &rule, &widths);
        for line in &cells {
            render_line(&mut out, line, &widths);
        }
        out
    }
}

fn render_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut first = true;
    for (cell, width) in cells.iter().zip(widths.iter().copied()) {
        if !first {
            out.push_str("  ");
        }
        out.push_str(&format!("{cell:<width$}"));
        first = false;
    }
    // Trailing spaces off the last column
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Re-order one row's data array into the table's metric-column order
///
/// The response's `columnIds` array, not the request's metric order, names the
/// positions of the data array; missing columns read as zero.
pub fn order_metric_values(
    row: &ReportRow,
    column_ids: &[String],
    names: &HashMap<String, String>,
    metric_order: &[String],
) -> Vec<f64> {
    let mut by_name: HashMap<&str, f64> = HashMap::new();
    for (idx, column_id) in column_ids.iter().enumerate() {
        if let Some(name) = names.get(column_id) {
            by_name.insert(name.as_str(), row.data.get(idx).copied().unwrap_or(0.0));
        }
    }

    metric_order
        .iter()
        .map(|name| by_name.get(name.as_str()).copied().unwrap_or(0.0))
        .collect()
}
