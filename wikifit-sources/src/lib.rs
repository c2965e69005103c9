//! # wikifit-sources
//!
//! Multi-source Wikimedia knowledge aggregation for WikiFit.
//!
//! One search term is normalised once and sent concurrently to nine content
//! services. Every service answers in its own fixed shape, and every
//! failure is converted into data, so an aggregate always has exactly nine
//! entries.
//!
//! ## Design
//!
//! - Wikipedia via the REST summary endpoint
//! - Wiktionary, Wikiquote, Wikibooks, Wikiversity and Wikispecies via
//!   action-API plain-text extracts
//! - Wikimedia Commons via a two-step file search and image-info lookup
//! - Wikisource via full-text search snippets
//! - Wikidata via entity search plus a health-property allow-list
//! - Optional in-memory TTL cache in front of both sources and aggregates
//!
//! ## Security
//!
//! - No API keys or secrets
//! - No network listeners; this is a library, not a server
//! - Search terms are logged only at trace level

pub mod adapter;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod sources;
pub mod types;

pub use adapter::SourceAdapter;
pub use config::SourcesConfig;
pub use error::{Result, SourceError};
pub use sources::WikiAdapter;
pub use types::{
    AggregatedResult, EntityProperty, ImageDescriptor, ResultShape, SearchTerm, Snippet, Source,
    SourceResult, StructuredEntity,
};

/// Normalise a raw user term: trim surrounding whitespace and join words
/// with underscores.
///
/// Normalisation is idempotent and preserves case.
pub fn normalize_term(raw: &str) -> SearchTerm {
    SearchTerm::normalize(raw)
}

/// Query all nine sources concurrently for `raw` and merge the results.
///
/// Never fails. Each source contributes either its content or its failure
/// value (an error message for text and entity sources, an empty list for
/// image and snippet sources).
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// let config = wikifit_sources::SourcesConfig::default();
/// let agg = wikifit_sources::aggregate("Vitamin D", &config).await;
/// for (source, result) in agg.iter() {
///     println!("{source}: {result:?}");
/// }
/// # }
/// ```
pub async fn aggregate(raw: &str, config: &SourcesConfig) -> AggregatedResult {
    let term = normalize_term(raw);
    tracing::trace!(term = %term, "aggregate requested");
    orchestrator::aggregate::orchestrate_aggregate(&term, config).await
}

/// Aggregate with [`SourcesConfig::default()`].
pub async fn aggregate_default(raw: &str) -> AggregatedResult {
    aggregate(raw, &SourcesConfig::default()).await
}

/// Query a single source for `raw`.
///
/// Goes through the same cache and failure conversion as [`aggregate`], so
/// the result equals that source's entry in a full aggregate.
pub async fn fetch_source(source: Source, raw: &str, config: &SourcesConfig) -> SourceResult {
    let term = normalize_term(raw);
    if let Err(err) = config.validate() {
        return adapter::failure_result(source, &term, &err);
    }
    let adapter = WikiAdapter::for_source(source);
    orchestrator::aggregate::resolve(&adapter, &term, config, config.caching_enabled())
        .await
        .result
}
