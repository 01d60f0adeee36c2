pub mod draft;
pub mod export;
pub mod search;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};

/// `{ "success": false, "error": ... }` with the given status.
pub fn failure(status: StatusCode, message: impl Into<String>) -> impl IntoResponse {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": message.into() })),
    )
}
