use serde_json::Value;

use crate::types::{PageResult, Post, Record, SearchResponse};

/// Flatten a decoded search response into a page of records.
///
/// Never fails. Anything that does not match the expected shape degrades to
/// empty values, so a response with no `data.searchResults` yields an empty
/// last page.
pub fn normalize(value: Value) -> PageResult {
    let response: SearchResponse = serde_json::from_value(value).unwrap_or_default();
    response.into_page()
}

impl SearchResponse {
    pub fn into_page(self) -> PageResult {
        let results = self.data.and_then(|d| d.search_results).unwrap_or_default();
        let page_info = results.page_info.unwrap_or_default();

        let records = results
            .edges
            .into_iter()
            .flat_map(|edge| {
                edge.node
                    .and_then(|n| n.thread)
                    .map(|t| t.thread_items)
                    .unwrap_or_default()
            })
            .map(|item| item.post.map(Post::into_record).unwrap_or_default())
            .collect();

        PageResult {
            records,
            next_cursor: page_info.end_cursor.filter(|c| !c.is_empty()),
            has_more: page_info.has_next_page.unwrap_or(false),
        }
    }
}

impl Post {
    pub fn into_record(self) -> Record {
        let caption = self
            .text_post_app_info
            .and_then(|info| info.text_fragments)
            .and_then(|tf| tf.fragments)
            .map(|fragments| {
                fragments
                    .into_iter()
                    .map(|f| f.plaintext.unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(" ")
            });

        let (username, user_id) = match self.user {
            Some(user) => (user.username.filter(|u| !u.is_empty()), user.pk),
            None => (None, None),
        };

        Record {
            username,
            caption,
            post_id: self.pk,
            user_id,
        }
    }
}
