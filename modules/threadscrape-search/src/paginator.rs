use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::{debug, info, warn};

use threads_client::PageResult;

use crate::traits::PageSource;
use crate::types::{PageError, SearchOutcome, Termination};

/// Failure tolerance for one search.
#[derive(Debug, Clone, Copy)]
pub struct PagingPolicy {
    /// Failures in a row that end the search.
    pub max_consecutive_errors: u32,
    /// Upper bound on a single page request; expiry counts as a failure.
    pub page_timeout: Duration,
}

impl Default for PagingPolicy {
    fn default() -> Self {
        Self {
            max_consecutive_errors: 3,
            page_timeout: Duration::from_secs(30),
        }
    }
}

/// Drives one search: fetch a page, keep its records, follow the cursor.
///
/// Pages are fetched strictly one after another since each cursor comes from
/// the previous response. A failed attempt still consumes one page of budget
/// and keeps the old cursor, so the next attempt asks for the same position.
/// The first page has no cursor by definition and is retried until the error
/// threshold; a later failure with no cursor to resume from ends the search.
pub struct Paginator {
    source: Arc<dyn PageSource>,
    policy: PagingPolicy,
    cancel: Arc<AtomicBool>,
}

impl Paginator {
    pub fn new(source: Arc<dyn PageSource>, policy: PagingPolicy) -> Self {
        Self {
            source,
            policy,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag. It is checked before each
    /// page, never in the middle of one.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub async fn run(&self, query: &str, page_size: u32, max_pages: u32) -> SearchOutcome {
        info!(query, page_size, max_pages, "Search starting");

        let mut records = Vec::new();
        let mut page_errors = Vec::new();
        let mut cursor: Option<String> = None;
        let mut has_more = true;
        let mut page_index: u32 = 0;
        let mut consecutive_errors: u32 = 0;
        let mut fetched_any = false;

        let termination = loop {
            if !has_more {
                break Termination::NoMorePages;
            }
            if page_index >= max_pages {
                break Termination::PageBudgetReached;
            }
            if self.cancel.load(Ordering::Relaxed) {
                break Termination::Cancelled;
            }

            match self.fetch(query, page_size, cursor.as_deref()).await {
                Ok(page) => {
                    debug!(
                        page = page_index,
                        records = page.records.len(),
                        next_cursor = page.next_cursor.as_deref().unwrap_or("<none>"),
                        has_more = page.has_more,
                        "Search page fetched"
                    );
                    records.extend(page.records);
                    cursor = page.next_cursor;
                    has_more = page.has_more;
                    consecutive_errors = 0;
                    fetched_any = true;
                }
                Err(e) => {
                    warn!(page = page_index, error = %e, "Search page failed");
                    page_errors.push(PageError {
                        page_index,
                        message: e.to_string(),
                    });
                    consecutive_errors += 1;

                    if consecutive_errors >= self.policy.max_consecutive_errors {
                        page_index += 1;
                        break Termination::TooManyErrors;
                    }
                    // Before any success the start position is still valid to retry.
                    if fetched_any && cursor.is_none() {
                        has_more = false;
                    }
                }
            }

            page_index += 1;
        };

        let outcome = SearchOutcome {
            records,
            pages_processed: page_index,
            page_errors,
            termination,
        };
        info!("Search finished: {outcome}");
        outcome
    }

    async fn fetch(&self, query: &str, page_size: u32, cursor: Option<&str>) -> Result<PageResult> {
        match tokio::time::timeout(
            self.policy.page_timeout,
            self.source.fetch_page(query, page_size, cursor),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(anyhow!(
                "Page request timed out after {}ms",
                self.policy.page_timeout.as_millis()
            )),
        }
    }
}
