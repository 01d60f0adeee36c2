use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use threads_client::ThreadsClient;
use threadscrape_api::{router, AppState};
use threadscrape_common::Config;
use threadscrape_search::{FileDraftStore, PagingPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("threadscrape=info".parse()?)
                .add_directive("threads_client=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let client = ThreadsClient::new(&config.graphql_url, config.request_timeout)?;
    let drafts = Arc::new(FileDraftStore::new(config.draft_path.clone()));
    let policy = PagingPolicy {
        max_consecutive_errors: config.max_consecutive_errors,
        page_timeout: config.request_timeout,
    };

    let state = Arc::new(AppState::new(client, drafts, policy));
    let app = router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("threadscrape API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
