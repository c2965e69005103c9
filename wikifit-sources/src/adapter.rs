//! Trait definition for per-service source adapters.
//!
//! Each content service implements [`SourceAdapter`]. Adapters report
//! failures as typed [`SourceError`]s from [`SourceAdapter::query`]; the
//! provided [`SourceAdapter::fetch`] and the orchestrator turn those into
//! data with [`failure_result`], so a failure can never escape as a fault.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::types::{ResultShape, SearchTerm, Source, SourceResult};

/// A pluggable content-service backend.
///
/// Implementors own, for one service:
///
/// - request construction with service-specific query parameters
/// - response parsing into the source's fixed [`ResultShape`]
/// - classification of failures into [`SourceError`]
///
/// All implementations must be `Send + Sync` for concurrent fan-out.
pub trait SourceAdapter: Send + Sync {
    /// Query the service and parse its response.
    ///
    /// When several candidate entries come back, the first in response
    /// order wins; adapters never re-rank.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, unexpected status,
    /// unreadable body, or when the response holds nothing usable.
    fn query(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> impl std::future::Future<Output = Result<SourceResult, SourceError>> + Send;

    /// Returns which [`Source`] this adapter serves.
    fn source(&self) -> Source;

    /// Query the service, converting any failure into a result value.
    ///
    /// Never fails: errors, panics and wrong-shaped results become
    /// [`SourceResult::Error`] for text and entity sources, or an empty list
    /// for list sources.
    fn fetch(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> impl std::future::Future<Output = SourceResult> + Send {
        async move {
            let source = self.source();
            guarded_query(self, term, config)
                .await
                .unwrap_or_else(|err| report_failure(source, term, &err))
        }
    }
}

/// Run [`SourceAdapter::query`] with panics captured and the result shape
/// checked against the adapter's source.
///
/// # Errors
///
/// The adapter's own error, or [`SourceError::Internal`] for a panic or a
/// result of the wrong shape.
pub async fn guarded_query<A>(
    adapter: &A,
    term: &SearchTerm,
    config: &SourcesConfig,
) -> Result<SourceResult, SourceError>
where
    A: SourceAdapter + ?Sized,
{
    let source = adapter.source();
    match AssertUnwindSafe(adapter.query(term, config))
        .catch_unwind()
        .await
    {
        Ok(Ok(result)) if result.fits(source) => Ok(result),
        Ok(Ok(_)) => Err(SourceError::Internal(
            "adapter returned the wrong result shape".into(),
        )),
        Ok(Err(err)) => Err(err),
        Err(_) => Err(SourceError::Internal("adapter panicked".into())),
    }
}

/// Log a failed query and convert it with [`failure_result`].
pub fn report_failure(source: Source, term: &SearchTerm, err: &SourceError) -> SourceResult {
    tracing::warn!(source = %source, error = %err, "source query failed");
    failure_result(source, term, err)
}

/// Convert an error into the value `source` reports in its place.
///
/// List-shaped sources yield an empty list; text and entity sources yield a
/// user-presentable [`SourceResult::Error`] message.
pub fn failure_result(source: Source, term: &SearchTerm, err: &SourceError) -> SourceResult {
    match source.shape() {
        ResultShape::Images => SourceResult::Images(Vec::new()),
        ResultShape::Snippets => SourceResult::Snippets(Vec::new()),
        ResultShape::Text | ResultShape::Entity => {
            SourceResult::Error(failure_message(source, term, err))
        }
    }
}

/// Message shown when `source` reports nothing usable for a term.
pub fn empty_message(source: Source) -> &'static str {
    match source {
        Source::Wikipedia => "No summary found. This topic might not have an article on Wikipedia yet.",
        Source::Wiktionary => "No definition found.",
        Source::Wikiquote => "No quotes found for this topic.",
        Source::Wikibooks => "No Wikibooks content found for this topic.",
        Source::Wikiversity => "No Wikiversity resources found for this topic.",
        Source::Wikispecies => "No species information found.",
        Source::Wikidata => "No detailed Wikidata information available.",
        Source::Commons => "No images found.",
        Source::Wikisource => "No texts found.",
    }
}

fn failure_message(source: Source, term: &SearchTerm, err: &SourceError) -> String {
    match err {
        SourceError::NotFound(_) if source == Source::Wikidata => {
            "No Wikidata information found for this term.".to_owned()
        }
        SourceError::NotFound(_) => format!(
            "The topic '{term}' was not found on {}. Please check spelling or try another term.",
            source.name()
        ),
        SourceError::Disambiguation(_) => format!(
            "'{term}' refers to multiple topics. Please try a more specific search term."
        ),
        SourceError::Empty(_) => empty_message(source).to_owned(),
        SourceError::Status(code) => {
            format!("Error retrieving {}: HTTP {code}", source.noun())
        }
        SourceError::Transport(_) if source == Source::Wikipedia => {
            "Connection error. Please check your internet connection and try again later."
                .to_owned()
        }
        SourceError::Transport(_) => "Connection error. Please try again later.".to_owned(),
        SourceError::Parse(_) => format!(
            "Error retrieving {}: unexpected response format",
            source.noun()
        ),
        SourceError::Config(_) | SourceError::Internal(_) => {
            format!("Error retrieving {}: source unavailable", source.noun())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Snippet;

    /// A mock adapter for testing the provided `fetch` conversion.
    struct MockAdapter {
        source: Source,
        outcome: Result<SourceResult, SourceError>,
    }

    impl SourceAdapter for MockAdapter {
        async fn query(
            &self,
            _term: &SearchTerm,
            _config: &SourcesConfig,
        ) -> Result<SourceResult, SourceError> {
            self.outcome.clone()
        }

        fn source(&self) -> Source {
            self.source
        }
    }

    struct PanickingAdapter;

    impl SourceAdapter for PanickingAdapter {
        async fn query(
            &self,
            _term: &SearchTerm,
            _config: &SourcesConfig,
        ) -> Result<SourceResult, SourceError> {
            let empty: Vec<SourceResult> = Vec::new();
            Ok(empty[3].clone())
        }

        fn source(&self) -> Source {
            Source::Wikibooks
        }
    }

    fn term(raw: &str) -> SearchTerm {
        SearchTerm::normalize(raw)
    }

    #[test]
    fn mock_adapter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockAdapter>();
    }

    #[tokio::test]
    async fn fetch_passes_success_through() {
        let adapter = MockAdapter {
            source: Source::Wikipedia,
            outcome: Ok(SourceResult::Text("Vitamin D is a...".into())),
        };
        let result = adapter.fetch(&term("Vitamin D"), &SourcesConfig::default()).await;
        assert_eq!(result, SourceResult::Text("Vitamin D is a...".into()));
    }

    #[tokio::test]
    async fn fetch_converts_error_for_text_source() {
        let adapter = MockAdapter {
            source: Source::Wiktionary,
            outcome: Err(SourceError::Status(500)),
        };
        let result = adapter.fetch(&term("run"), &SourcesConfig::default()).await;
        assert_eq!(
            result,
            SourceResult::Error("Error retrieving definition: HTTP 500".into())
        );
    }

    #[tokio::test]
    async fn fetch_converts_error_for_list_source() {
        let adapter = MockAdapter {
            source: Source::Wikisource,
            outcome: Err(SourceError::Transport("timed out".into())),
        };
        let result = adapter.fetch(&term("run"), &SourcesConfig::default()).await;
        assert_eq!(result, SourceResult::Snippets(vec![]));
    }

    #[tokio::test]
    async fn fetch_rejects_wrong_shape() {
        let adapter = MockAdapter {
            source: Source::Commons,
            outcome: Ok(SourceResult::Snippets(vec![Snippet {
                title: "t".into(),
                snippet: "s".into(),
            }])),
        };
        let result = adapter.fetch(&term("run"), &SourcesConfig::default()).await;
        assert_eq!(result, SourceResult::Images(vec![]));
    }

    #[tokio::test]
    async fn fetch_captures_panics() {
        let result = PanickingAdapter
            .fetch(&term("run"), &SourcesConfig::default())
            .await;
        assert_eq!(
            result,
            SourceResult::Error("Error retrieving content: source unavailable".into())
        );
    }

    #[tokio::test]
    async fn guarded_query_reports_panic_as_internal() {
        let err = guarded_query(&PanickingAdapter, &term("run"), &SourcesConfig::default())
            .await
            .expect_err("panic must surface as an error");
        assert_eq!(err, SourceError::Internal("adapter panicked".into()));
    }

    #[test]
    fn wikipedia_not_found_message() {
        let result = failure_result(
            Source::Wikipedia,
            &term("Nonexistent Topic Xyz"),
            &SourceError::NotFound("404".into()),
        );
        match result {
            SourceResult::Error(msg) => {
                assert!(msg.contains("not found on Wikipedia"), "{msg}");
                assert!(msg.contains("'Nonexistent_Topic_Xyz'"), "{msg}");
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn disambiguation_message() {
        let result = failure_result(
            Source::Wikipedia,
            &term("Mercury"),
            &SourceError::Disambiguation("Mercury".into()),
        );
        assert_eq!(
            result,
            SourceResult::Error(
                "'Mercury' refers to multiple topics. Please try a more specific search term."
                    .into()
            )
        );
    }

    #[test]
    fn transport_messages_differ_for_wikipedia() {
        let err = SourceError::Transport("dns".into());
        let wiki = failure_result(Source::Wikipedia, &term("x"), &err);
        let quote = failure_result(Source::Wikiquote, &term("x"), &err);
        assert_eq!(
            wiki,
            SourceResult::Error(
                "Connection error. Please check your internet connection and try again later."
                    .into()
            )
        );
        assert_eq!(
            quote,
            SourceResult::Error("Connection error. Please try again later.".into())
        );
    }

    #[test]
    fn wikidata_messages() {
        let not_found = failure_result(
            Source::Wikidata,
            &term("zzz"),
            &SourceError::NotFound("no hits".into()),
        );
        assert_eq!(
            not_found,
            SourceResult::Error("No Wikidata information found for this term.".into())
        );
        let status = failure_result(Source::Wikidata, &term("zzz"), &SourceError::Status(502));
        assert_eq!(
            status,
            SourceResult::Error("Error retrieving Wikidata: HTTP 502".into())
        );
    }

    #[test]
    fn empty_messages_per_source() {
        let err = SourceError::Empty("nothing".into());
        assert_eq!(
            failure_result(Source::Wikiquote, &term("x"), &err),
            SourceResult::Error("No quotes found for this topic.".into())
        );
        assert_eq!(
            failure_result(Source::Wikispecies, &term("x"), &err),
            SourceResult::Error("No species information found.".into())
        );
    }

    #[test]
    fn list_sources_always_empty_on_failure() {
        for err in [
            SourceError::NotFound("x".into()),
            SourceError::Status(500),
            SourceError::Parse("x".into()),
            SourceError::Internal("x".into()),
        ] {
            assert_eq!(
                failure_result(Source::Commons, &term("x"), &err),
                SourceResult::Images(vec![])
            );
            assert_eq!(
                failure_result(Source::Wikisource, &term("x"), &err),
                SourceResult::Snippets(vec![])
            );
        }
    }
}
