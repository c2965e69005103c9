//! Error types for the wikifit application crate.

/// Top-level error type for question answering and configuration.
#[derive(Debug, thiserror::Error)]
pub enum WikiFitError {
    /// Model download or loading error.
    #[error("model error: {0}")]
    Model(String),

    /// Tokenization or inference error while scoring a question.
    #[error("scorer error: {0}")]
    Scorer(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, WikiFitError>;
