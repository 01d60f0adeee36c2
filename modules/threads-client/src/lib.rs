pub mod curl;
pub mod error;
pub mod normalize;
pub mod types;

pub use curl::RequestDescriptor;
pub use error::{Result, ThreadsError};
pub use normalize::normalize;
pub use types::{PageResult, Record, SearchResponse};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Threads' internal GraphQL endpoint used by the web search page.
pub const DEFAULT_GRAPHQL_URL: &str = "https://www.threads.com/graphql/query";

/// Headers the HTTP client computes itself; replaying captured values would
/// be wrong once the body changes.
const RECOMPUTED_HEADERS: &[&str] = &["content-length", "host"];

pub struct ThreadsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ThreadsClient {
    /// Build a client for `endpoint`. Every request is bounded by `timeout`.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch and normalize one page of search results, replaying the captured
    /// request with the query, page size and cursor swapped in.
    pub async fn search_page(
        &self,
        descriptor: &RequestDescriptor,
        query: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<PageResult> {
        let raw = self.search_raw(descriptor, query, page_size, cursor).await?;
        Ok(normalize(raw))
    }

    /// Same as [`search_page`](Self::search_page) but returns the decoded JSON
    /// untouched.
    pub async fn search_raw(
        &self,
        descriptor: &RequestDescriptor,
        query: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<Value> {
        let headers = header_map(descriptor)?;
        let body = rewrite_variables(descriptor.body(), query, page_size, cursor);

        tracing::debug!(
            endpoint = %self.endpoint,
            cursor = cursor.unwrap_or("<first>"),
            page_size,
            "Requesting search page"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ThreadsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ThreadsError::Parse(format!(
                "{e}; body starts with: {}",
                text.chars().take(200).collect::<String>()
            ))
        })
    }
}

/// Rewrite the `variables` JSON inside a URL-encoded GraphQL form body.
///
/// `after`, `before`, `first` and `query` are overwritten; every other
/// variable and form field is kept as captured, in captured order. A
/// missing or unreadable `variables` field starts from an empty object.
pub fn rewrite_variables(
    raw_body: &str,
    query: &str,
    page_size: u32,
    cursor: Option<&str>,
) -> String {
    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(raw_body.as_bytes())
        .into_owned()
        .collect();

    let mut variables = pairs
        .iter()
        .find(|(k, _)| k == "variables")
        .and_then(|(_, v)| serde_json::from_str::<Value>(v).ok())
        .and_then(|v| match v {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .unwrap_or_else(Map::new);

    variables.insert(
        "after".to_string(),
        cursor.map(Value::from).unwrap_or(Value::Null),
    );
    variables.insert("before".to_string(), Value::Null);
    variables.insert("first".to_string(), Value::from(page_size));
    variables.insert("query".to_string(), Value::from(query));
    let encoded = Value::Object(variables).to_string();

    // First `variables` field takes the new value, later duplicates go.
    let mut replaced = false;
    pairs.retain_mut(|(k, v)| {
        if k != "variables" {
            return true;
        }
        if replaced {
            return false;
        }
        *v = encoded.clone();
        replaced = true;
        true
    });
    if !replaced {
        pairs.push(("variables".to_string(), encoded));
    }

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn header_map(descriptor: &RequestDescriptor) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (name, value) in descriptor.headers() {
        let name = name.trim();
        if name.starts_with(':')
            || RECOMPUTED_HEADERS
                .iter()
                .any(|h| name.eq_ignore_ascii_case(h))
        {
            continue;
        }

        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ThreadsError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value =
            HeaderValue::from_str(value.trim()).map_err(|e| ThreadsError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        headers.append(header_name, header_value);
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
    }

    Ok(headers)
}
