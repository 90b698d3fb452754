//! Pagination state tracking

use crate::report::ReportResponse;

/// Tracks paging progress across one report query
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// Page to request next (zero-based)
    pub page: u32,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Rows fetched so far
    pub rows_fetched: u64,
    /// Total pages, once the first response reported it
    pub total_pages: Option<u32>,
    /// Is paging complete?
    pub done: bool,
}

impl PageState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Record one fetched page and decide whether another follows
    ///
    /// Stops on the API's `lastPage` marker, on a `totalPages == 0` empty
    /// result (where `lastPage` stays false), when the page counter reaches
    /// `totalPages`, or when a page comes back without rows.
    pub fn record_page(&mut self, response: &ReportResponse) {
        self.pages_fetched += 1;
        self.rows_fetched += response.rows.len() as u64;

        if self.total_pages.is_none() {
            self.total_pages = Some(response.total_pages);
        }

        if response.last_page
            || response.total_pages == 0
            || response.rows.is_empty()
            || self.page + 1 >= response.total_pages
        {
            self.mark_done();
        } else {
            self.page += 1;
        }
    }
}
