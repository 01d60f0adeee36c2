use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use threads_client::{Record, RequestDescriptor};
use threadscrape_common::{SearchDraft, SearchRequest, ThreadscrapeError};
use threadscrape_search::{PageError, Paginator, ReplaySource, Termination};

use super::failure;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<Record>,
    pub total_results: usize,
    pub pages_processed: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PageError>,
    pub termination: Termination,
    pub search_id: Uuid,
    pub message: String,
}

pub async fn api_search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return failure(StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    if let Err(e) = req.validate() {
        let message = match e {
            ThreadscrapeError::Validation(m) => m,
            other => other.to_string(),
        };
        return failure(StatusCode::BAD_REQUEST, message).into_response();
    }

    if let Err(e) = state.drafts.save(&SearchDraft::from(&req)).await {
        warn!(error = %e, "Failed to save search draft");
    }

    let search_id = req.search_id.unwrap_or_else(Uuid::new_v4);
    let Some(registration) = SearchRegistration::register(&state, search_id) else {
        return failure(
            StatusCode::CONFLICT,
            format!("Search {search_id} is already running"),
        )
        .into_response();
    };

    let descriptor = RequestDescriptor::parse(&req.curl_command);
    info!(
        %search_id,
        captured_url = descriptor.url(),
        headers = descriptor.headers().len(),
        body_len = descriptor.body().len(),
        "Parsed captured request"
    );

    let source = Arc::new(ReplaySource::new(state.client.clone(), descriptor));
    let outcome = Paginator::new(source, state.policy)
        .with_cancel(registration.cancel.clone())
        .run(&req.query, req.page_size, req.max_pages)
        .await;
    drop(registration);

    let message = outcome.summary();
    Json(SearchResponse {
        success: true,
        total_results: outcome.records.len(),
        data: outcome.records,
        pages_processed: outcome.pages_processed,
        errors: outcome.page_errors,
        termination: outcome.termination,
        search_id,
        message,
    })
    .into_response()
}

pub async fn api_cancel_search(
    State(state): State<Arc<AppState>>,
    Path(search_id): Path<Uuid>,
) -> Response {
    let flag = state
        .searches
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&search_id)
        .cloned();

    match flag {
        Some(flag) => {
            flag.store(true, Ordering::Relaxed);
            info!(%search_id, "Search cancellation requested");
            (
                StatusCode::ACCEPTED,
                Json(serde_json::json!({ "success": true, "searchId": search_id })),
            )
                .into_response()
        }
        None => failure(
            StatusCode::NOT_FOUND,
            format!("No running search with id {search_id}"),
        )
        .into_response(),
    }
}

/// Keeps a search's cancel flag reachable while it runs. Unregisters on drop,
/// including when the client disconnects and the handler future is dropped.
struct SearchRegistration {
    state: Arc<AppState>,
    search_id: Uuid,
    cancel: Arc<AtomicBool>,
}

impl SearchRegistration {
    fn register(state: &Arc<AppState>, search_id: Uuid) -> Option<Self> {
        let mut searches = state.searches.lock().unwrap_or_else(|e| e.into_inner());
        if searches.contains_key(&search_id) {
            return None;
        }
        let cancel = Arc::new(AtomicBool::new(false));
        searches.insert(search_id, cancel.clone());
        Some(Self {
            state: state.clone(),
            search_id,
            cancel,
        })
    }
}

impl Drop for SearchRegistration {
    fn drop(&mut self) {
        self.state
            .searches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.search_id);
    }
}
