//! Source adapter implementations.
//!
//! Each module provides a struct implementing [`crate::adapter::SourceAdapter`]
//! for one response family. [`WikiAdapter`] wraps them so the orchestrator can
//! hold all nine in one list.

pub mod commons;
pub mod extracts;
pub mod wikidata;
pub mod wikipedia;
pub mod wikisource;
mod wire;

pub use commons::CommonsAdapter;
pub use extracts::ExtractsAdapter;
pub use wikidata::WikidataAdapter;
pub use wikipedia::WikipediaAdapter;
pub use wikisource::WikisourceAdapter;

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::types::{SearchTerm, Source, SourceResult};

/// Any of the built-in adapters.
#[derive(Debug, Clone)]
pub enum WikiAdapter {
    /// Encyclopedia REST summaries.
    Wikipedia(WikipediaAdapter),
    /// Action-API plain-text extracts (dictionary, quotes, books, courses, species).
    Extracts(ExtractsAdapter),
    /// Media search.
    Commons(CommonsAdapter),
    /// Text search snippets.
    Wikisource(WikisourceAdapter),
    /// Structured knowledge base.
    Wikidata(WikidataAdapter),
}

impl WikiAdapter {
    /// The built-in adapter for `source`.
    pub fn for_source(source: Source) -> Self {
        match source {
            Source::Wikipedia => Self::Wikipedia(WikipediaAdapter),
            Source::Wiktionary => Self::Extracts(ExtractsAdapter::wiktionary()),
            Source::Wikiquote => Self::Extracts(ExtractsAdapter::wikiquote()),
            Source::Wikibooks => Self::Extracts(ExtractsAdapter::wikibooks()),
            Source::Wikiversity => Self::Extracts(ExtractsAdapter::wikiversity()),
            Source::Wikispecies => Self::Extracts(ExtractsAdapter::wikispecies()),
            Source::Commons => Self::Commons(CommonsAdapter::default()),
            Source::Wikisource => Self::Wikisource(WikisourceAdapter),
            Source::Wikidata => Self::Wikidata(WikidataAdapter),
        }
    }

    /// One adapter per source, in canonical order.
    pub fn all() -> Vec<Self> {
        Source::all().iter().map(|s| Self::for_source(*s)).collect()
    }
}

impl SourceAdapter for WikiAdapter {
    async fn query(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> Result<SourceResult, SourceError> {
        match self {
            Self::Wikipedia(a) => a.query(term, config).await,
            Self::Extracts(a) => a.query(term, config).await,
            Self::Commons(a) => a.query(term, config).await,
            Self::Wikisource(a) => a.query(term, config).await,
            Self::Wikidata(a) => a.query(term, config).await,
        }
    }

    fn source(&self) -> Source {
        match self {
            Self::Wikipedia(a) => a.source(),
            Self::Extracts(a) => a.source(),
            Self::Commons(a) => a.source(),
            Self::Wikisource(a) => a.source(),
            Self::Wikidata(a) => a.source(),
        }
    }
}
