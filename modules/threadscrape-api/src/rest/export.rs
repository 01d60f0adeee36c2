use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use threads_client::Record;

use super::failure;
use crate::csv;

#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    data: Vec<Record>,
}

/// Render posted records as a CSV download.
pub async fn api_export_csv(payload: Result<Json<ExportRequest>, JsonRejection>) -> Response {
    let Json(body) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return failure(StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    if body.data.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "No data available to export").into_response();
    }

    let filename = format!(
        "search-results-{}.csv",
        chrono::Utc::now().timestamp_millis()
    );
    let disposition = format!("attachment; filename=\"{filename}\"");

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv::write_records(&body.data),
    )
        .into_response()
}
