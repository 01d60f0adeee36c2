use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Flattened output ---

/// One discovered post, flattened for tabular display and CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub username: Option<String>,
    pub caption: Option<String>,
    pub post_id: Option<String>,
    pub user_id: Option<String>,
}

/// One normalized page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResult {
    pub records: Vec<Record>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

// --- Remote GraphQL schema (search results, v1) ---
//
// The payload belongs to a third party. Every field is optional and decoded
// leniently: a wrong type becomes `None`, an undecodable list element becomes
// `Default`, so one odd item never costs the whole page.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<SearchData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchData {
    #[serde(rename = "searchResults", default, deserialize_with = "lenient")]
    pub search_results: Option<SearchResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub edges: Vec<Edge>,
    #[serde(default, deserialize_with = "lenient")]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub end_cursor: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_next_page: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Edge {
    #[serde(default, deserialize_with = "lenient")]
    pub node: Option<EdgeNode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdgeNode {
    #[serde(default, deserialize_with = "lenient")]
    pub thread: Option<Thread>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thread {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub thread_items: Vec<ThreadItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadItem {
    #[serde(default, deserialize_with = "lenient")]
    pub post: Option<Post>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    #[serde(default, deserialize_with = "lenient_id")]
    pub pk: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<PostUser>,
    #[serde(default, deserialize_with = "lenient")]
    pub text_post_app_info: Option<TextPostAppInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUser {
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub pk: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextPostAppInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub text_fragments: Option<TextFragments>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextFragments {
    #[serde(default, deserialize_with = "lenient_opt_vec")]
    pub fragments: Option<Vec<Fragment>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fragment {
    #[serde(default, deserialize_with = "lenient")]
    pub plaintext: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient_opt_vec(deserializer)?.unwrap_or_default())
}

fn lenient_opt_vec<'de, D, T>(deserializer: D) -> std::result::Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// Ids show up both as strings and as bare numbers.
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
