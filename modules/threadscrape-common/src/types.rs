use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ThreadscrapeError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_LOOP_COUNT: u32 = 1;

/// A search submission as posted by the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_page_size", deserialize_with = "de_count")]
    pub page_size: u32,
    /// Page budget. The form calls it `loopCount`.
    #[serde(rename = "loopCount", default = "default_loop_count", deserialize_with = "de_count")]
    pub max_pages: u32,
    /// Raw "Copy as cURL" transcript.
    #[serde(default)]
    pub curl_command: String,
    /// Caller-chosen id so the search can be cancelled while it runs.
    #[serde(default)]
    pub search_id: Option<Uuid>,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), ThreadscrapeError> {
        if self.query.trim().is_empty() {
            return Err(ThreadscrapeError::Validation("Query is required".to_string()));
        }
        if self.curl_command.trim().is_empty() {
            return Err(ThreadscrapeError::Validation(
                "Curl command is required".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ThreadscrapeError::Validation(
                "Page size must be at least 1".to_string(),
            ));
        }
        if self.max_pages == 0 {
            return Err(ThreadscrapeError::Validation(
                "Loop count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// The last submitted form values, restored when the form is reopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDraft {
    pub query: String,
    pub curl_command: String,
    pub loop_count: u32,
    pub page_size: u32,
}

impl Default for SearchDraft {
    fn default() -> Self {
        Self {
            query: String::new(),
            curl_command: String::new(),
            loop_count: DEFAULT_LOOP_COUNT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<&SearchRequest> for SearchDraft {
    fn from(req: &SearchRequest) -> Self {
        Self {
            query: req.query.clone(),
            curl_command: req.curl_command.clone(),
            loop_count: req.max_pages,
            page_size: req.page_size,
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_loop_count() -> u32 {
    DEFAULT_LOOP_COUNT
}

/// Counts arrive as numbers or as numeric strings from text inputs.
fn de_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| de::Error::custom(format!("expected a non-negative integer, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> SearchRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_form_payload() {
        let req = request(json!({
            "query": "rust",
            "pageSize": 20,
            "loopCount": "4",
            "curlCommand": "curl 'https://x.test'"
        }));
        assert_eq!(req.page_size, 20);
        assert_eq!(req.max_pages, 4);
        assert_eq!(req.search_id, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn missing_counts_take_form_defaults() {
        let req = request(json!({ "query": "q", "curlCommand": "curl 'x'" }));
        assert_eq!(req.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(req.max_pages, DEFAULT_LOOP_COUNT);
    }

    #[test]
    fn rejects_non_numeric_counts() {
        let result: Result<SearchRequest, _> =
            serde_json::from_value(json!({ "query": "q", "loopCount": "many" }));
        assert!(result.is_err());

        let result: Result<SearchRequest, _> =
            serde_json::from_value(json!({ "query": "q", "pageSize": -2 }));
        assert!(result.is_err());
    }

    #[test]
    fn validation_messages() {
        let mut req = request(json!({ "query": "q", "curlCommand": "curl 'x'" }));
        req.query = "  ".to_string();
        assert!(matches!(req.validate(), Err(ThreadscrapeError::Validation(m)) if m == "Query is required"));

        req.query = "q".to_string();
        req.max_pages = 0;
        assert!(matches!(req.validate(), Err(ThreadscrapeError::Validation(m)) if m.contains("Loop count")));

        req.max_pages = 1;
        req.curl_command.clear();
        assert!(matches!(req.validate(), Err(ThreadscrapeError::Validation(m)) if m.contains("Curl")));
    }

    #[test]
    fn draft_mirrors_request_and_has_form_defaults() {
        let req = request(json!({
            "query": "q", "pageSize": 5, "loopCount": 2, "curlCommand": "curl 'x'"
        }));
        let draft = SearchDraft::from(&req);
        assert_eq!(draft.loop_count, 2);
        assert_eq!(draft.page_size, 5);

        let defaults = SearchDraft::default();
        assert_eq!(defaults.loop_count, 1);
        assert_eq!(defaults.page_size, 10);
        assert_eq!(
            serde_json::to_value(&defaults).unwrap(),
            json!({ "query": "", "curlCommand": "", "loopCount": 1, "pageSize": 10 })
        );
    }
}
