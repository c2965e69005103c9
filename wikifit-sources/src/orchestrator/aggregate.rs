//! Core aggregation: normalise once, fan out to all adapters, merge.
//!
//! One adapter failing (error, wrong shape, or panic) only affects its own
//! entry. No retries are attempted; each source gets one call per aggregate.

use crate::adapter::{failure_result, guarded_query, report_failure, SourceAdapter};
use crate::cache::{self, CacheKey};
use crate::config::SourcesConfig;
use crate::sources::WikiAdapter;
use crate::types::{AggregatedResult, SearchTerm, Source, SourceResult};

/// The resolved result of one adapter call.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Which source produced the result.
    pub source: Source,
    /// The result, already converted to data on failure.
    pub result: SourceResult,
    /// Whether the adapter succeeded (cache hits count as success).
    pub succeeded: bool,
}

/// Aggregate across all nine built-in adapters.
///
/// # Pipeline
///
/// 1. Return a cached aggregate when caching is on and one exists
/// 2. Fan out to every adapter concurrently with [`futures::future::join_all`]
/// 3. Resolve each call independently (per-source cache, query, failure conversion)
/// 4. Merge into the fixed nine-key map
/// 5. Cache the aggregate only if every source succeeded
///
/// An invalid config does not fail the call: every source reports the
/// config error in its own shape instead.
pub async fn orchestrate_aggregate(term: &SearchTerm, config: &SourcesConfig) -> AggregatedResult {
    if let Err(err) = config.validate() {
        tracing::warn!(error = %err, "invalid sources config, skipping all requests");
        return AggregatedResult::from_results(
            term.clone(),
            Source::all()
                .iter()
                .map(|source| (*source, failure_result(*source, term, &err))),
        );
    }

    let caching = config.caching_enabled();
    let key = CacheKey::for_aggregate(term, config);
    if caching {
        if let Some(hit) = cache::get_aggregate(&key, config.cache_ttl_seconds).await {
            tracing::debug!(term = %term, "aggregate cache hit");
            return hit;
        }
    }

    let adapters = WikiAdapter::all();
    let resolved = resolve_all(term, &adapters, config, caching).await;
    let complete = resolved.iter().all(|r| r.succeeded);

    let aggregated = merge(term, resolved);
    if caching && complete {
        cache::insert_aggregate(key, aggregated.clone(), config.cache_ttl_seconds).await;
    }
    aggregated
}

/// Aggregate across a caller-supplied adapter set, bypassing the caches.
///
/// Sources not covered by `adapters` are filled with their failure value,
/// so the result still has all nine keys.
pub async fn aggregate_with<A: SourceAdapter>(
    term: &SearchTerm,
    adapters: &[A],
    config: &SourcesConfig,
) -> AggregatedResult {
    let resolved = resolve_all(term, adapters, config, false).await;
    merge(term, resolved)
}

async fn resolve_all<A: SourceAdapter>(
    term: &SearchTerm,
    adapters: &[A],
    config: &SourcesConfig,
    caching: bool,
) -> Vec<Resolved> {
    let futures: Vec<_> = adapters
        .iter()
        .map(|adapter| resolve(adapter, term, config, caching))
        .collect();
    futures::future::join_all(futures).await
}

fn merge(term: &SearchTerm, resolved: Vec<Resolved>) -> AggregatedResult {
    let failed = resolved.iter().filter(|r| !r.succeeded).count();
    tracing::debug!(term = %term, sources = resolved.len(), failed, "aggregate assembled");
    AggregatedResult::from_results(
        term.clone(),
        resolved.into_iter().map(|r| (r.source, r.result)),
    )
}

/// Resolve a single adapter call into data.
///
/// Consults the per-source cache when `caching` is set, captures panics,
/// rejects results of the wrong shape, and converts errors with
/// [`failure_result`]. Only successes are cached.
pub async fn resolve<A: SourceAdapter>(
    adapter: &A,
    term: &SearchTerm,
    config: &SourcesConfig,
    caching: bool,
) -> Resolved {
    let source = adapter.source();
    let key = CacheKey::for_source(source, term, config);

    if caching {
        if let Some(result) = cache::get_source(&key, config.cache_ttl_seconds).await {
            tracing::trace!(source = %source, "source cache hit");
            return Resolved {
                source,
                result,
                succeeded: true,
            };
        }
    }

    match guarded_query(adapter, term, config).await {
        Ok(result) => {
            if caching {
                cache::insert_source(key, result.clone(), config.cache_ttl_seconds).await;
            }
            Resolved {
                source,
                result,
                succeeded: true,
            }
        }
        Err(err) => Resolved {
            source,
            result: report_failure(source, term, &err),
            succeeded: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stub adapter with a scripted behaviour.
    struct StubAdapter {
        source: Source,
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    #[derive(Clone)]
    enum Behaviour {
        Succeed(SourceResult),
        Fail(SourceError),
        Panic,
    }

    impl StubAdapter {
        fn new(source: Source, behaviour: Behaviour) -> Self {
            Self {
                source,
                behaviour,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl SourceAdapter for StubAdapter {
        async fn query(
            &self,
            _term: &SearchTerm,
            _config: &SourcesConfig,
        ) -> Result<SourceResult, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Succeed(result) => Ok(result.clone()),
                Behaviour::Fail(err) => Err(err.clone()),
                Behaviour::Panic => panic!("stub adapter exploded"),
            }
        }

        fn source(&self) -> Source {
            self.source
        }
    }

    fn no_cache() -> SourcesConfig {
        SourcesConfig {
            cache_ttl_seconds: 0,
            ..Default::default()
        }
    }

    fn healthy(source: Source) -> StubAdapter {
        let result = match source {
            Source::Commons => SourceResult::Images(vec![]),
            Source::Wikisource => SourceResult::Snippets(vec![]),
            _ => SourceResult::Text(format!("{} ok", source.id())),
        };
        StubAdapter::new(source, Behaviour::Succeed(result))
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_others() {
        let term = SearchTerm::normalize("Vitamin D");
        let adapters: Vec<StubAdapter> = Source::all()
            .iter()
            .map(|s| match s {
                Source::Wiktionary => {
                    StubAdapter::new(*s, Behaviour::Fail(SourceError::Status(503)))
                }
                _ => healthy(*s),
            })
            .collect();

        let agg = aggregate_with(&term, &adapters, &no_cache()).await;

        assert_eq!(agg.len(), 9);
        assert_eq!(
            agg.get(Source::Wiktionary),
            Some(&SourceResult::Error("Error retrieving definition: HTTP 503".into()))
        );
        assert_eq!(
            agg.get(Source::Wikipedia),
            Some(&SourceResult::Text("wikipedia ok".into()))
        );
        assert_eq!(
            agg.get(Source::Wikidata),
            Some(&SourceResult::Text("wikidata ok".into()))
        );
        for adapter in &adapters {
            assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn panicking_adapter_is_isolated() {
        let term = SearchTerm::normalize("Yoga");
        let adapters: Vec<StubAdapter> = Source::all()
            .iter()
            .map(|s| match s {
                Source::Commons | Source::Wikipedia => StubAdapter::new(*s, Behaviour::Panic),
                _ => healthy(*s),
            })
            .collect();

        let agg = aggregate_with(&term, &adapters, &no_cache()).await;

        assert_eq!(agg.len(), 9);
        assert_eq!(agg.get(Source::Commons), Some(&SourceResult::Images(vec![])));
        assert!(agg.get(Source::Wikipedia).is_some_and(SourceResult::is_error));
        assert_eq!(
            agg.get(Source::Wikiquote),
            Some(&SourceResult::Text("wikiquote ok".into()))
        );
    }

    #[tokio::test]
    async fn every_source_failing_still_yields_nine_keys() {
        let term = SearchTerm::normalize("Nonexistent Topic Xyz");
        let adapters: Vec<StubAdapter> = Source::all()
            .iter()
            .map(|s| StubAdapter::new(*s, Behaviour::Fail(SourceError::Transport("down".into()))))
            .collect();

        let agg = aggregate_with(&term, &adapters, &no_cache()).await;

        assert_eq!(agg.len(), 9);
        assert_eq!(agg.failed_sources().len(), 7);
        assert_eq!(agg.get(Source::Commons), Some(&SourceResult::Images(vec![])));
        assert_eq!(agg.get(Source::Wikisource), Some(&SourceResult::Snippets(vec![])));
    }

    #[tokio::test]
    async fn empty_adapter_set_still_yields_nine_keys() {
        let agg = aggregate_with::<StubAdapter>(&SearchTerm::normalize("x"), &[], &no_cache()).await;
        assert_eq!(agg.len(), 9);
    }

    #[tokio::test]
    async fn wrong_shape_is_rejected() {
        let adapter = StubAdapter::new(
            Source::Wikisource,
            Behaviour::Succeed(SourceResult::Text("not snippets".into())),
        );
        let resolved = resolve(&adapter, &SearchTerm::normalize("x"), &no_cache(), false).await;
        assert!(!resolved.succeeded);
        assert_eq!(resolved.result, SourceResult::Snippets(vec![]));
    }

    #[tokio::test]
    async fn result_order_independent_of_adapter_order() {
        let term = SearchTerm::normalize("Sleep");
        let adapters: Vec<StubAdapter> = Source::all().iter().rev().map(|s| healthy(*s)).collect();
        let agg = aggregate_with(&term, &adapters, &no_cache()).await;
        let order: Vec<Source> = agg.iter().map(|(s, _)| s).collect();
        assert_eq!(order, Source::all().to_vec());
    }

    #[tokio::test]
    async fn resolve_caches_only_successes() {
        let config = SourcesConfig {
            cache_ttl_seconds: 600,
            endpoint_base: Some("http://resolve-cache-test.invalid".into()),
            ..Default::default()
        };
        let term = SearchTerm::normalize("resolve_cache_check");

        let failing = StubAdapter::new(
            Source::Wikiquote,
            Behaviour::Fail(SourceError::Status(500)),
        );
        let first = resolve(&failing, &term, &config, true).await;
        assert!(!first.succeeded);

        let working = StubAdapter::new(
            Source::Wikiquote,
            Behaviour::Succeed(SourceResult::Text("quote".into())),
        );
        let second = resolve(&working, &term, &config, true).await;
        assert_eq!(second.result, SourceResult::Text("quote".into()));
        assert_eq!(working.calls.load(Ordering::SeqCst), 1);

        // Now cached: a third adapter is never called.
        let third = StubAdapter::new(Source::Wikiquote, Behaviour::Panic);
        let cached = resolve(&third, &term, &config, true).await;
        assert_eq!(cached.result, SourceResult::Text("quote".into()));
        assert_eq!(third.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_config_reports_in_every_source() {
        let config = SourcesConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let agg = orchestrate_aggregate(&SearchTerm::normalize("x"), &config).await;
        assert_eq!(agg.len(), 9);
        assert_eq!(
            agg.get(Source::Wikipedia),
            Some(&SourceResult::Error(
                "Error retrieving information: source unavailable".into()
            ))
        );
        assert_eq!(agg.get(Source::Commons), Some(&SourceResult::Images(vec![])));
    }
}
