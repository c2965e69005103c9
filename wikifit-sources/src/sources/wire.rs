//! Wire types shared by the MediaWiki action-API adapters.
//!
//! Only the fields we read are modelled; everything else is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level `action=query` response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActionResponse {
    #[serde(default)]
    pub query: ActionQuery,
}

/// The `query` object: `pages` for `titles=` lookups, `search` for `list=search`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActionQuery {
    /// Keyed by page id, kept in response order.
    #[serde(default)]
    pub pages: Map<String, Value>,
    #[serde(default)]
    pub search: Vec<SearchHit>,
}

/// One `list=search` hit.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: String,
}

/// Pages whose id is a positive number, in response order.
///
/// MediaWiki reports titles that do not exist under ids `-1`, `-2`, …
pub(crate) fn existing_pages(pages: &Map<String, Value>) -> impl Iterator<Item = &Value> {
    pages.iter().filter_map(|(id, page)| match id.parse::<i64>() {
        Ok(n) if n > 0 => Some(page),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn existing_pages_skips_missing_and_keeps_order() {
        let response: ActionResponse = serde_json::from_value(json!({
            "query": {
                "pages": {
                    "-1": {"title": "Missing", "missing": ""},
                    "904": {"title": "Second"},
                    "12": {"title": "Third"},
                    "0": {"title": "Zero"}
                }
            }
        }))
        .expect("deserialize");
        let titles: Vec<&str> = existing_pages(&response.query.pages)
            .filter_map(|p| p["title"].as_str())
            .collect();
        assert_eq!(titles, vec!["Second", "Third"]);
    }

    #[test]
    fn missing_query_object_defaults() {
        let response: ActionResponse =
            serde_json::from_value(json!({"batchcomplete": ""})).expect("deserialize");
        assert!(response.query.pages.is_empty());
        assert!(response.query.search.is_empty());
    }

    #[test]
    fn search_hits_tolerate_extra_fields() {
        let response: ActionResponse = serde_json::from_value(json!({
            "query": {"search": [{"ns": 0, "title": "A", "snippet": "s", "size": 10}]}
        }))
        .expect("deserialize");
        assert_eq!(response.query.search.len(), 1);
        assert_eq!(response.query.search[0].title.as_deref(), Some("A"));
    }
}
