//! Paginated report retrieval
//!
//! The reports endpoint pages via `settings.page` in the POST body rather
//! than query parameters. [`ReportPager`] walks the pages of one query until
//! the API reports the last page, accumulating every page's rows in order.

mod types;


pub use types::PageState;

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::report::{ReportRequest, ReportResponse, ReportRow};
use tracing::debug;

/// Fetches every page of a report query
#[derive(Debug, Clone)]
pub struct ReportPager {
    /// Reports endpoint URL
    url: String,
}

impl ReportPager {
    /// Create a pager for the given reports endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The endpoint this pager posts to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every page of the given request
    ///
    /// The request is cloned; only its `settings.page` is rewritten between
    /// calls, starting from page 0.
    pub async fn fetch_all(
        &self,
        http: &HttpClient,
        request: &ReportRequest,
    ) -> Result<PagedReport> {
        request.validate()?;

        let mut request = request.clone();
        let mut state = PageState::new();
        let mut responses = Vec::new();

        loop {
            request.set_page(state.page);
            let body = serde_json::to_value(&request)?;
            let response = http
                .post_with_config(&self.url, RequestConfig::new().json(body))
                .await?;

            let body_text = response.text().await.map_err(|e| {
                Error::decode(format!("Failed to read response body: {e}"))
            })?;
            let response: ReportResponse = serde_json::from_str(&body_text)
                .map_err(|e| Error::decode(format!("Failed to parse report response: {e}")))?;

            debug!(
                dimension = %request.dimension,
                page = state.page,
                rows = response.rows.len(),
                total_pages = response.total_pages,
                "fetched report page"
            );

            state.record_page(&response);
            responses.push(response);

            if state.done {
                break;
            }
        }

        Ok(PagedReport { responses, state })
    }
}

/// All pages of one report query
#[derive(Debug, Clone)]
pub struct PagedReport {
    /// Response pages in fetch order
    pub responses: Vec<ReportResponse>,
    /// Final paging state
    pub state: PageState,
}

impl PagedReport {
    /// The first response page, if any was fetched
    pub fn first(&self) -> Option<&ReportResponse> {
        self.responses.first()
    }

    /// Iterate all rows across pages in response order
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.responses.iter().flat_map(|r| r.rows.iter())
    }

    /// Total number of rows across pages
    pub fn row_count(&self) -> usize {
        self.responses.iter().map(|r| r.rows.len()).sum()
    }

    /// True when the query matched nothing
    pub fn is_empty(&self) -> bool {
        self.first().map_or(true, ReportResponse::is_empty)
    }
}
