//! Wikipedia: encyclopedia summaries via the REST `page/summary` endpoint.
//!
//! Unlike the other summary-style sources this is a REST resource, so the
//! term travels in the URL path and the response is a single object.

use serde::Deserialize;
use url::Url;

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::http;
use crate::types::{SearchTerm, Source, SourceResult};

/// Wikipedia REST summary adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikipediaAdapter;

#[derive(Debug, Deserialize)]
struct RestSummary {
    #[serde(default)]
    extract: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl SourceAdapter for WikipediaAdapter {
    async fn query(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> Result<SourceResult, SourceError> {
        tracing::trace!(term = %term, "Wikipedia summary");

        let client = http::build_client(config)?;
        let endpoint = Source::Wikipedia.endpoint(config.endpoint_base.as_deref());
        let url = summary_url(&endpoint, term)?;

        let summary: RestSummary = http::get_json(&client, url.as_str(), &[]).await?;
        parse_summary(summary, term)
    }

    fn source(&self) -> Source {
        Source::Wikipedia
    }
}

/// Build `<endpoint>/page/summary/<term>`, percent-encoding the term as a
/// single path segment.
fn summary_url(endpoint: &str, term: &SearchTerm) -> Result<Url, SourceError> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| SourceError::Config(format!("invalid Wikipedia endpoint: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| SourceError::Config("Wikipedia endpoint cannot be a base URL".into()))?
        .pop_if_empty()
        .extend(["page", "summary", term.as_str()]);
    Ok(url)
}

fn parse_summary(summary: RestSummary, term: &SearchTerm) -> Result<SourceResult, SourceError> {
    if summary.extract.trim().is_empty() {
        if summary.kind.as_deref() == Some("disambiguation") {
            return Err(SourceError::Disambiguation(term.to_string()));
        }
        return Err(SourceError::Empty(term.to_string()));
    }
    tracing::debug!(chars = summary.extract.len(), "Wikipedia summary parsed");
    Ok(SourceResult::Text(summary.extract))
}
