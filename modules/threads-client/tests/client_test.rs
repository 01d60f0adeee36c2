//! ThreadsClient against an in-process stand-in for the GraphQL endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use threads_client::{RequestDescriptor, ThreadsClient, ThreadsError};
use url::form_urlencoded;

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, String)>>>,
}

async fn search_ok(State(captured): State<Captured>, headers: HeaderMap, body: String) -> Json<Value> {
    captured.requests.lock().unwrap().push((headers, body));
    Json(json!({
        "data": {
            "searchResults": {
                "edges": [{
                    "node": { "thread": { "thread_items": [{
                        "post": {
                            "pk": "3301",
                            "user": { "username": "rustacean", "pk": "77" },
                            "text_post_app_info": { "text_fragments": { "fragments": [
                                { "plaintext": "ferris" }, { "plaintext": "says hi" }
                            ] } }
                        }
                    }] } }
                }],
                "page_info": { "end_cursor": "next-1", "has_next_page": true }
            }
        }
    }))
}

async fn server_error() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn not_json() -> &'static str {
    "<html>please log in</html>"
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "{}"
}

async fn spawn_endpoint(captured: Captured) -> String {
    let app = Router::new()
        .route("/graphql/query", post(search_ok))
        .route("/broken", post(server_error))
        .route("/html", post(not_json))
        .route("/slow", post(slow))
        .with_state(captured);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn descriptor() -> RequestDescriptor {
    RequestDescriptor::parse(
        "curl 'https://www.threads.com/graphql/query' \\\n  -H 'x-fb-friendly-name: SearchResultsQuery' \\\n  -H 'Cookie: stale=1' \\\n  -b 'sessionid=fresh' \\\n  --data-raw 'doc_id=123&variables=%7B%22query%22%3A%22old%22%7D'",
    )
}

#[tokio::test]
async fn replays_descriptor_and_normalizes_page() {
    let captured = Captured::default();
    let base = spawn_endpoint(captured.clone()).await;
    let client =
        ThreadsClient::new(&format!("{base}/graphql/query"), Duration::from_secs(5)).unwrap();

    let page = client
        .search_page(&descriptor(), "ferris", 5, Some("cur-0"))
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].username.as_deref(), Some("rustacean"));
    assert_eq!(page.records[0].caption.as_deref(), Some("ferris says hi"));
    assert_eq!(page.records[0].post_id.as_deref(), Some("3301"));
    assert_eq!(page.records[0].user_id.as_deref(), Some("77"));
    assert_eq!(page.next_cursor.as_deref(), Some("next-1"));
    assert!(page.has_more);

    let requests = captured.requests.lock().unwrap();
    let (headers, body) = &requests[0];
    assert_eq!(headers.get("cookie").unwrap(), "sessionid=fresh");
    assert_eq!(headers.get("x-fb-friendly-name").unwrap(), "SearchResultsQuery");

    let variables: Value = form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .find(|(k, _)| k == "variables")
        .map(|(_, v)| serde_json::from_str(&v).unwrap())
        .unwrap();
    assert_eq!(variables["query"], "ferris");
    assert_eq!(variables["after"], "cur-0");
    assert_eq!(variables["first"], 5);
    assert_eq!(variables["before"], Value::Null);
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let base = spawn_endpoint(Captured::default()).await;
    let client = ThreadsClient::new(&format!("{base}/broken"), Duration::from_secs(5)).unwrap();

    let err = client
        .search_page(&descriptor(), "q", 10, None)
        .await
        .unwrap_err();
    match err {
        ThreadsError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_parse_error() {
    let base = spawn_endpoint(Captured::default()).await;
    let client = ThreadsClient::new(&format!("{base}/html"), Duration::from_secs(5)).unwrap();

    let err = client
        .search_page(&descriptor(), "q", 10, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ThreadsError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_endpoint_is_timeout() {
    let base = spawn_endpoint(Captured::default()).await;
    let client = ThreadsClient::new(&format!("{base}/slow"), Duration::from_millis(200)).unwrap();

    let err = client
        .search_page(&descriptor(), "q", 10, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ThreadsError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_endpoint_is_network_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ThreadsClient::new(&format!("http://{addr}/graphql/query"), Duration::from_secs(5)).unwrap();
    let err = client
        .search_page(&descriptor(), "q", 10, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ThreadsError::Network(_)), "got {err:?}");
}
