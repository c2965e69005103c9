//! Plain-text extracts from the MediaWiki action API.
//!
//! Wiktionary, Wikiquote, Wikibooks, Wikiversity and Wikispecies all answer
//! `action=query&prop=extracts` the same way, differing only in how many
//! sentences are requested. One adapter covers all five.

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::http;
use crate::types::{SearchTerm, Source, SourceResult};

use super::wire::{existing_pages, ActionResponse};

/// Action-API extracts adapter for one summary-style source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractsAdapter {
    source: Source,
    sentences: Option<u32>,
    plain_sections: bool,
    trim: bool,
}

impl ExtractsAdapter {
    /// Dictionary definitions: five sentences, plain section headings.
    pub fn wiktionary() -> Self {
        Self {
            source: Source::Wiktionary,
            sentences: Some(5),
            plain_sections: true,
            trim: false,
        }
    }

    /// Quotations: five sentences, surrounding whitespace trimmed.
    pub fn wikiquote() -> Self {
        Self {
            source: Source::Wikiquote,
            sentences: Some(5),
            plain_sections: false,
            trim: true,
        }
    }

    /// Book content: ten sentences.
    pub fn wikibooks() -> Self {
        Self {
            source: Source::Wikibooks,
            sentences: Some(10),
            plain_sections: false,
            trim: false,
        }
    }

    /// Learning resources: five sentences.
    pub fn wikiversity() -> Self {
        Self {
            source: Source::Wikiversity,
            sentences: Some(5),
            plain_sections: false,
            trim: false,
        }
    }

    /// Species pages: the whole extract.
    pub fn wikispecies() -> Self {
        Self {
            source: Source::Wikispecies,
            sentences: None,
            plain_sections: false,
            trim: false,
        }
    }

    fn params<'a>(&self, term: &'a SearchTerm, sentences: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("action", "query"),
            ("format", "json"),
            ("titles", term.as_str()),
            ("prop", "extracts"),
        ];
        if self.plain_sections {
            params.push(("exsectionformat", "plain"));
        }
        if self.sentences.is_some() {
            params.push(("exsentences", sentences));
        }
        params.push(("explaintext", "1"));
        params
    }
}

impl SourceAdapter for ExtractsAdapter {
    async fn query(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> Result<SourceResult, SourceError> {
        tracing::trace!(source = %self.source, term = %term, "extracts query");

        let client = http::build_client(config)?;
        let endpoint = self.source.endpoint(config.endpoint_base.as_deref());
        let sentences = self.sentences.map(|n| n.to_string()).unwrap_or_default();

        let response: ActionResponse =
            http::get_json(&client, &endpoint, &self.params(term, &sentences)).await?;

        let extract = first_extract(&response).ok_or_else(|| SourceError::Empty(term.to_string()))?;
        let extract = if self.trim {
            extract.trim().to_owned()
        } else {
            extract
        };
        tracing::debug!(source = %self.source, chars = extract.len(), "extract parsed");
        Ok(SourceResult::Text(extract))
    }

    fn source(&self) -> Source {
        self.source
    }
}

/// The first existing page with a non-blank extract, as received.
fn first_extract(response: &ActionResponse) -> Option<String> {
    existing_pages(&response.query.pages)
        .filter_map(|page| page.get("extract").and_then(|e| e.as_str()))
        .find(|extract| !extract.trim().is_empty())
        .map(str::to_owned)
}
