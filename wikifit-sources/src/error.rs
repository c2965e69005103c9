//! Error types for the wikifit-sources crate.
//!
//! These errors never cross the adapter boundary: every [`SourceError`] is
//! converted into a [`crate::types::SourceResult`] of the shape the source
//! would have produced on success. They exist so adapters can use `?` and so
//! the conversion happens in exactly one place.

/// Errors that can occur while querying a single content service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The service answered 404, or the lookup matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The page exists but only lists several distinct topics.
    #[error("disambiguation page: {0}")]
    Disambiguation(String),

    /// The service answered 200 but carried no usable content.
    #[error("no content: {0}")]
    Empty(String),

    /// Any non-200, non-404 HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Timeout, DNS failure, refused connection or a broken body stream.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the JSON shape we expected.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid sources configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The adapter itself misbehaved (panicked or returned the wrong shape).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for wikifit-sources results.
pub type Result<T> = std::result::Result<T, SourceError>;
