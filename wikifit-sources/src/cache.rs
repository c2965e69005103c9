//! In-memory TTL caches for source and aggregate results.
//!
//! Two process-wide [`moka`] caches sit in front of the adapters and in
//! front of [`crate::aggregate`]. They are pure accelerators: only complete
//! successes are stored, so a cold, warm or expired cache yields the same
//! results.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;
use std::time::Duration;

use moka::future::Cache;

use crate::config::SourcesConfig;
use crate::types::{AggregatedResult, SearchTerm, Source, SourceResult};

/// Maximum number of entries per cache.
const MAX_CACHE_ENTRIES: u64 = 256;

/// Per-source results. TTL is fixed by the first caller.
static SOURCE_CACHE: OnceLock<Cache<CacheKey, SourceResult>> = OnceLock::new();

/// Whole aggregates. TTL is fixed by the first caller.
static AGGREGATE_CACHE: OnceLock<Cache<CacheKey, AggregatedResult>> = OnceLock::new();

/// Cache key: operation + normalised term + request fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// `Some(source)` for a single adapter, `None` for an aggregate.
    scope: Option<Source>,
    /// Normalised term, case preserved (wiki titles are case-sensitive).
    term: String,
    /// Hash of the config fields that change what a request returns.
    fingerprint: u64,
}

impl CacheKey {
    /// Key for one source's result.
    pub fn for_source(source: Source, term: &SearchTerm, config: &SourcesConfig) -> Self {
        Self {
            scope: Some(source),
            term: term.as_str().to_owned(),
            fingerprint: fingerprint(config),
        }
    }

    /// Key for an aggregated result.
    pub fn for_aggregate(term: &SearchTerm, config: &SourcesConfig) -> Self {
        Self {
            scope: None,
            term: term.as_str().to_owned(),
            fingerprint: fingerprint(config),
        }
    }
}

fn build_cache<V>(ttl_seconds: u64) -> Cache<CacheKey, V>
where
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(MAX_CACHE_ENTRIES)
        .time_to_live(Duration::from_secs(ttl_seconds))
        .build()
}

/// Look up a cached source result.
pub async fn get_source(key: &CacheKey, ttl_seconds: u64) -> Option<SourceResult> {
    SOURCE_CACHE
        .get_or_init(|| build_cache(ttl_seconds))
        .get(key)
        .await
}

/// Store a source result.
pub async fn insert_source(key: CacheKey, result: SourceResult, ttl_seconds: u64) {
    SOURCE_CACHE
        .get_or_init(|| build_cache(ttl_seconds))
        .insert(key, result)
        .await;
}

/// Look up a cached aggregate.
pub async fn get_aggregate(key: &CacheKey, ttl_seconds: u64) -> Option<AggregatedResult> {
    AGGREGATE_CACHE
        .get_or_init(|| build_cache(ttl_seconds))
        .get(key)
        .await
}

/// Store an aggregate.
pub async fn insert_aggregate(key: CacheKey, result: AggregatedResult, ttl_seconds: u64) {
    AGGREGATE_CACHE
        .get_or_init(|| build_cache(ttl_seconds))
        .insert(key, result)
        .await;
}

/// Hash the config fields that affect responses.
fn fingerprint(config: &SourcesConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.image_limit.hash(&mut hasher);
    config.endpoint_base.hash(&mut hasher);
    hasher.finish()
}
