//! Wikisource: full-text search snippets.

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::http;
use crate::types::{SearchTerm, Snippet, Source, SourceResult};

use super::wire::{ActionResponse, SearchHit};

/// Number of search hits requested.
const SEARCH_LIMIT: &str = "3";

/// Wikisource snippet-search adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikisourceAdapter;

impl SourceAdapter for WikisourceAdapter {
    async fn query(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> Result<SourceResult, SourceError> {
        tracing::trace!(term = %term, "Wikisource search");

        let client = http::build_client(config)?;
        let endpoint = Source::Wikisource.endpoint(config.endpoint_base.as_deref());

        let response: ActionResponse = http::get_json(
            &client,
            &endpoint,
            &[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", term.as_str()),
                ("srlimit", SEARCH_LIMIT),
            ],
        )
        .await?;

        let snippets: Vec<Snippet> = response.query.search.into_iter().map(to_snippet).collect();
        tracing::debug!(count = snippets.len(), "Wikisource snippets parsed");
        Ok(SourceResult::Snippets(snippets))
    }

    fn source(&self) -> Source {
        Source::Wikisource
    }
}

fn to_snippet(hit: SearchHit) -> Snippet {
    Snippet {
        title: hit.title.unwrap_or_default(),
        snippet: strip_highlights(&hit.snippet),
    }
}

/// Remove `<span class="searchmatch">…</span>` highlight wrappers, keeping
/// the matched text.
fn strip_highlights(snippet: &str) -> String {
    snippet
        .replace("<span class=\"searchmatch\">", "")
        .replace("</span>", "")
}
