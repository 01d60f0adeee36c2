// Test mocks for the paging loop.
//
// MockSource (PageSource): scripted responses consumed in order, then a
// fallback step repeated forever. Records every cursor it was asked for.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use threads_client::{PageResult, Record};

use crate::traits::PageSource;

#[derive(Clone)]
pub enum Step {
    Page(PageResult),
    Fail(String),
    /// Sleep, then return an empty last page.
    Stall(Duration),
    /// Raise the flag, then return the page.
    CancelThen(Arc<AtomicBool>, PageResult),
}

pub struct MockSource {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    cursors: Mutex<Vec<Option<String>>>,
}

impl MockSource {
    /// Fails every call not scripted with `then_*`.
    pub fn new() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback: Step::Fail("no scripted response".to_string()),
            cursors: Mutex::new(Vec::new()),
        }
    }

    /// Every call returns one record and claims there is more.
    pub fn always_more() -> Self {
        Self::new().otherwise(Step::Page(page(vec![record("p")], Some("next"), true)))
    }

    pub fn always_failing(message: &str) -> Self {
        Self::new().otherwise(Step::Fail(message.to_string()))
    }

    pub fn then_page(self, page: PageResult) -> Self {
        self.then(Step::Page(page))
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.then(Step::Fail(message.to_string()))
    }

    pub fn then(self, step: Step) -> Self {
        self.steps.lock().unwrap().push_back(step);
        self
    }

    pub fn otherwise(mut self, step: Step) -> Self {
        self.fallback = step;
        self
    }

    /// Cursors passed to each call, in call order.
    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageSource for MockSource {
    async fn fetch_page(
        &self,
        _query: &str,
        _page_size: u32,
        cursor: Option<&str>,
    ) -> Result<PageResult> {
        self.cursors.lock().unwrap().push(cursor.map(String::from));
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match step {
            Step::Page(page) => Ok(page),
            Step::Fail(message) => bail!(message),
            Step::Stall(duration) => {
                tokio::time::sleep(duration).await;
                Ok(PageResult::default())
            }
            Step::CancelThen(flag, page) => {
                flag.store(true, Ordering::Relaxed);
                Ok(page)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn record(post_id: &str) -> Record {
    Record {
        username: Some(format!("user-{post_id}")),
        caption: Some(format!("caption {post_id}")),
        post_id: Some(post_id.to_string()),
        user_id: Some(format!("uid-{post_id}")),
    }
}

pub fn page(records: Vec<Record>, next_cursor: Option<&str>, has_more: bool) -> PageResult {
    PageResult {
        records,
        next_cursor: next_cursor.map(String::from),
        has_more,
    }
}
