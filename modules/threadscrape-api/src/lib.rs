use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use uuid::Uuid;

use threads_client::ThreadsClient;
use threadscrape_search::{DraftStore, PagingPolicy};

pub mod csv;
pub mod rest;

pub struct AppState {
    pub client: Arc<ThreadsClient>,
    pub drafts: Arc<dyn DraftStore>,
    pub policy: PagingPolicy,
    /// Cancellation flags of searches currently running, by search id.
    pub searches: Mutex<HashMap<Uuid, Arc<AtomicBool>>>,
}

impl AppState {
    pub fn new(client: ThreadsClient, drafts: Arc<dyn DraftStore>, policy: PagingPolicy) -> Self {
        Self {
            client: Arc::new(client),
            drafts,
            policy,
            searches: Mutex::new(HashMap::new()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // REST API
        .route("/api/search", post(rest::search::api_search))
        .route("/api/search/{id}/cancel", post(rest::search::api_cancel_search))
        .route(
            "/api/draft",
            get(rest::draft::api_get_draft).delete(rest::draft::api_reset_draft),
        )
        .route("/api/export/csv", post(rest::export::api_export_csv))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Results carry session-derived data; never cache them
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only (bodies carry session cookies)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "Error processing request");
    rest::failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to process request",
    )
    .into_response()
}
