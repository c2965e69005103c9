//! The extractive scorer seam.
//!
//! A [`Scorer`] picks the most likely answer span for a question within a
//! context passage. [`AnswerExtractor`](super::AnswerExtractor) owns the
//! policy around it; the scorer only scores.

use crate::error::Result;

/// One scoring request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRequest<'a> {
    /// The user's question.
    pub question: &'a str,
    /// The passage the answer must be taken from.
    pub context: &'a str,
    /// Longest span, in characters, that may be returned.
    pub max_answer_chars: usize,
    /// Whether the scorer may report that no span answers the question.
    pub handle_impossible: bool,
}

/// What the scorer found.
#[derive(Debug, Clone, PartialEq)]
pub enum ScorerOutput {
    /// A span of the context, verbatim, with its probability.
    Span {
        /// The extracted text.
        text: String,
        /// Span probability in `[0, 1]`.
        score: f32,
    },
    /// The null answer outscored every span.
    NoAnswer {
        /// Null-answer probability in `[0, 1]`.
        score: f32,
    },
}

impl ScorerOutput {
    /// The probability attached to this outcome.
    pub fn score(&self) -> f32 {
        match self {
            Self::Span { score, .. } | Self::NoAnswer { score } => *score,
        }
    }
}

/// A pretrained extractive question-answering model.
///
/// Implementations must be shareable across threads; scoring is blocking
/// and may be slow, so async callers should run it on a blocking thread.
pub trait Scorer: Send + Sync {
    /// Score `request` and return the best span or a no-answer verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if tokenization or inference fails.
    fn score(&self, request: &ScoreRequest<'_>) -> Result<ScorerOutput>;
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&self, request: &ScoreRequest<'_>) -> Result<ScorerOutput> {
        (**self).score(request)
    }
}

impl<S: Scorer + ?Sized> Scorer for std::sync::Arc<S> {
    fn score(&self, request: &ScoreRequest<'_>) -> Result<ScorerOutput> {
        (**self).score(request)
    }
}
