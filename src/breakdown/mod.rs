//! Breakdown report synthesis
//!
//! The reports endpoint returns one dimension per query. A multi-dimension
//! pivot is synthesized by re-querying once per parent value: every row
//! discovered at level `i` becomes an itemId-scoped breakdown filter on the
//! level `i+1` query, and the children are merged back onto their ancestor
//! path. Requests run sequentially through the shared transport, so rate
//! limiting and 429 retries apply per sub-query.


use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::{order_metric_values, ReportTable, TableRow};
use crate::pagination::ReportPager;
use crate::report::ReportRequest;
use tracing::{debug, info};

/// One ancestor on a breakdown path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Dimension the ancestor row came from
    pub dimension: String,
    /// Item id of the ancestor row
    pub item_id: String,
    /// Dimension value of the ancestor row
    pub value: String,
}

/// A chain of ancestor dimension values, outermost level first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BreakdownPath {
    /// Path segments; empty at the root
    pub segments: Vec<PathSegment>,
}

impl BreakdownPath {
    /// The empty root path
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of ancestor levels on this path
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Extend the path with one more ancestor
    pub fn child(
        &self,
        dimension: impl Into<String>,
        item_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment {
            dimension: dimension.into(),
            item_id: item_id.into(),
            value: value.into(),
        });
        Self { segments }
    }

    /// Attach one breakdown filter per ancestor to the request
    pub fn apply(&self, request: &mut ReportRequest) {
        for segment in &self.segments {
            request.add_breakdown_filter(&segment.dimension, &segment.item_id);
        }
    }

    /// Item ids along the path
    pub fn item_ids(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.item_id.clone()).collect()
    }

    /// Values along the path
    pub fn values(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.value.clone()).collect()
    }
}

/// Expands an ordered dimension list into one merged table
pub struct BreakdownExpander {
    /// Base request; its `dimension` is rewritten per level
    base: ReportRequest,
    /// Breakdown dimensions, outermost first
    dimensions: Vec<String>,
    /// Pager for the reports endpoint
    pager: ReportPager,
}

impl BreakdownExpander {
    /// Create an expander over the given dimensions
    pub fn new(
        base: ReportRequest,
        dimensions: Vec<String>,
        reports_url: impl Into<String>,
    ) -> Result<Self> {
        if dimensions.is_empty() {
            return Err(Error::report("breakdown requires at least one dimension"));
        }
        Ok(Self {
            base,
            dimensions,
            pager: ReportPager::new(reports_url),
        })
    }

    /// The dimensions this expander walks
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Run the full expansion
    ///
    /// Issues one paged query per value-path discovered at the previous
    /// level and merges the leaf rows into a single table keyed by each
    /// level's item id.
    pub async fn run(&self, http: &HttpClient) -> Result<ReportTable> {
        let mut table = ReportTable::new(self.dimensions.clone(), self.base.metric_ids());
        let mut frontier = vec![BreakdownPath::root()];

        for (level, dimension) in self.dimensions.iter().enumerate() {
            let leaf = level + 1 == self.dimensions.len();
            info!(
                level,
                dimension = %dimension,
                parents = frontier.len(),
                "expanding breakdown level"
            );

            let mut next_frontier = Vec::new();

            for path in &frontier {
                let request = self.level_request(dimension, path);
                let paged = self.pager.fetch_all(http, &request).await.map_err(|e| {
                    Error::breakdown(dimension.clone(), e.to_string())
                })?;
                let names = request.metric_names();

                debug!(
                    dimension = %dimension,
                    parent_items = ?path.item_ids(),
                    rows = paged.row_count(),
                    "fetched breakdown slice"
                );

                for response in &paged.responses {
                    for row in &response.rows {
                        let child = path.child(dimension, &row.item_id, &row.value);
                        if leaf {
                            let metrics = order_metric_values(
                                row,
                                &response.columns.column_ids,
                                &names,
                                &table.metrics,
                            );
                            table.rows.push(TableRow {
                                item_ids: child.item_ids(),
                                values: child.values(),
                                metrics,
                            });
                        } else {
                            next_frontier.push(child);
                        }
                    }
                }
            }

            if !leaf && next_frontier.is_empty() {
                // Nothing to break down further
                break;
            }
            frontier = next_frontier;
        }

        Ok(table)
    }

    /// Build the level query for one parent path
    fn level_request(&self, dimension: &str, path: &BreakdownPath) -> ReportRequest {
        let mut request = self.base.clone();
        request.dimension = dimension.to_string();
        path.apply(&mut request);
        request
    }
}

impl std::fmt::Debug for BreakdownExpander {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakdownExpander")
            .field("dimensions", &self.dimensions)
            .field("rsid", &self.base.rsid)
            .finish_non_exhaustive()
    }
}
