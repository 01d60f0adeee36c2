use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{info, warn};

use threadscrape_common::SearchDraft;

use super::failure;
use crate::AppState;

/// The last submitted form, or the form defaults.
pub async fn api_get_draft(State(state): State<Arc<AppState>>) -> Response {
    match state.drafts.load_or_default().await {
        Ok(draft) => Json(draft).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load search draft");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load saved form").into_response()
        }
    }
}

/// Form reset: the defaults become the saved draft.
pub async fn api_reset_draft(State(state): State<Arc<AppState>>) -> Response {
    let draft = SearchDraft::default();
    match state.drafts.save(&draft).await {
        Ok(()) => {
            info!("Search draft reset");
            Json(draft).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to reset search draft");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to reset saved form").into_response()
        }
    }
}
