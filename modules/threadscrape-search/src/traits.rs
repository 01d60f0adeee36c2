// Trait seam between the paging loop and the remote endpoint.
//
// ReplaySource is the real thing: a ThreadsClient plus the descriptor parsed
// once per search. Tests swap in testing::MockSource.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use threads_client::{PageResult, RequestDescriptor, ThreadsClient};

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one normalized page. `cursor` is `None` for the first page.
    async fn fetch_page(
        &self,
        query: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<PageResult>;
}

/// Replays a captured request against the GraphQL endpoint.
pub struct ReplaySource {
    client: Arc<ThreadsClient>,
    descriptor: RequestDescriptor,
}

impl ReplaySource {
    pub fn new(client: Arc<ThreadsClient>, descriptor: RequestDescriptor) -> Self {
        Self { client, descriptor }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl PageSource for ReplaySource {
    async fn fetch_page(
        &self,
        query: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<PageResult> {
        Ok(self
            .client
            .search_page(&self.descriptor, query, page_size, cursor)
            .await?)
    }
}
