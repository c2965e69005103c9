//! Confidence-gated answer extraction.
//!
//! [`AnswerExtractor`] wraps a [`Scorer`] with input validation and a trust
//! threshold. Every outcome, including a missing model and a scorer fault
//! or panic, comes back as a user-presentable string; nothing here fails
//! the caller.
//!
//! ```text
//! question ─▶ model loaded? ─▶ long enough? ─▶ score ─▶ confident? ─▶ span
//!                 │ no              │ no          │ err      │ no
//!                 ▼                 ▼             ▼          ▼
//!            unavailable        rejected       failed    refusal
//! ```

pub mod onnx;
pub mod scorer;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use tracing::{error, warn};

pub use onnx::OnnxQaScorer;
pub use scorer::{ScoreRequest, Scorer, ScorerOutput};

use crate::config::QaConfig;

/// Identifier of the pretrained QA model.
pub const MODEL_ID: &str = "distilbert-base-cased-distilled-squad";

/// Shown when the model could not be loaded.
pub const UNAVAILABLE_MESSAGE: &str =
    "AI model is not available. Please check that the QA model files can be downloaded and loaded.";

/// Shown when the question is too short to score.
pub const REJECTED_MESSAGE: &str = "Please ask a more specific question.";

/// Shown when no answer clears the confidence threshold.
pub const LOW_CONFIDENCE_MESSAGE: &str = "I don't have enough information to answer that question accurately. Please try a different question related to the topics covered.";

/// Prefix of the message shown when the scorer fails.
pub const FAILED_PREFIX: &str = "Sorry, I couldn't process your question. Error: ";

static SHARED: OnceLock<AnswerExtractor> = OnceLock::new();

/// Thresholds applied around the scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerPolicy {
    /// Questions with fewer characters are rejected without scoring.
    pub min_question_chars: usize,
    /// Spans scoring below this are refused.
    pub confidence_threshold: f32,
    /// Longest span the scorer may return, in characters.
    pub max_answer_chars: usize,
}

impl Default for AnswerPolicy {
    fn default() -> Self {
        Self::from(&QaConfig::default())
    }
}

impl From<&QaConfig> for AnswerPolicy {
    fn from(config: &QaConfig) -> Self {
        Self {
            min_question_chars: config.min_question_chars,
            confidence_threshold: config.confidence_threshold,
            max_answer_chars: config.max_answer_chars,
        }
    }
}

/// Typed outcome of one question.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// A span of the context cleared the threshold.
    Answered {
        /// The span, verbatim.
        text: String,
        /// Its probability.
        confidence: f32,
    },
    /// No scorer is loaded.
    Unavailable,
    /// The question was too short; the scorer was not called.
    Rejected,
    /// The best span scored below the threshold.
    LowConfidence {
        /// The best span's probability.
        confidence: f32,
    },
    /// The scorer judged the question unanswerable from the context.
    NoAnswer {
        /// The null answer's probability.
        confidence: f32,
    },
    /// The scorer raised an error.
    Failed(String),
}

impl Answer {
    /// Whether an answer span was returned.
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Answered { text, .. } => f.write_str(text),
            Self::Unavailable => f.write_str(UNAVAILABLE_MESSAGE),
            Self::Rejected => f.write_str(REJECTED_MESSAGE),
            Self::LowConfidence { .. } | Self::NoAnswer { .. } => {
                f.write_str(LOW_CONFIDENCE_MESSAGE)
            }
            Self::Failed(detail) => write!(f, "{FAILED_PREFIX}{detail}"),
        }
    }
}

/// Question answering over a supplied context passage.
pub struct AnswerExtractor {
    scorer: Option<Box<dyn Scorer>>,
    policy: AnswerPolicy,
}

impl fmt::Debug for AnswerExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnswerExtractor")
            .field("available", &self.is_available())
            .field("policy", &self.policy)
            .finish()
    }
}

impl AnswerExtractor {
    /// Wrap a loaded scorer.
    pub fn new(scorer: impl Scorer + 'static, policy: AnswerPolicy) -> Self {
        Self {
            scorer: Some(Box::new(scorer)),
            policy,
        }
    }

    /// An extractor whose model failed to load. Every question gets the
    /// unavailable message.
    pub fn unavailable(policy: AnswerPolicy) -> Self {
        Self {
            scorer: None,
            policy,
        }
    }

    /// Download and load the ONNX scorer, falling back to an unavailable
    /// extractor on any failure.
    pub fn load(config: &QaConfig) -> Self {
        let policy = AnswerPolicy::from(config);
        if let Err(e) = config.validate() {
            error!("invalid QA config: {e}");
            return Self::unavailable(policy);
        }
        match OnnxQaScorer::download_and_load(config.intra_threads) {
            Ok(scorer) => {
                tracing::info!("QA model {MODEL_ID} loaded");
                Self::new(scorer, policy)
            }
            Err(e) => {
                error!("error loading QA model {MODEL_ID}: {e}");
                Self::unavailable(policy)
            }
        }
    }

    /// The process-wide extractor, loaded on first call.
    ///
    /// The first caller's config wins. A load failure is kept: the shared
    /// extractor then stays unavailable for the life of the process.
    /// Blocking; may download the model.
    pub fn shared(config: &QaConfig) -> &'static AnswerExtractor {
        SHARED.get_or_init(|| Self::load(config))
    }

    /// Whether a scorer is loaded.
    pub fn is_available(&self) -> bool {
        self.scorer.is_some()
    }

    /// The active policy.
    pub fn policy(&self) -> &AnswerPolicy {
        &self.policy
    }

    /// Answer `question` from `context`, as display text.
    pub fn answer(&self, question: &str, context: &str) -> String {
        self.evaluate(question, context).to_string()
    }

    /// Answer `question` from `context`, as a typed outcome.
    pub fn evaluate(&self, question: &str, context: &str) -> Answer {
        let Some(scorer) = &self.scorer else {
            return Answer::Unavailable;
        };
        if question.chars().count() < self.policy.min_question_chars {
            return Answer::Rejected;
        }

        let request = ScoreRequest {
            question,
            context,
            max_answer_chars: self.policy.max_answer_chars,
            handle_impossible: true,
        };
        let scored = match panic::catch_unwind(AssertUnwindSafe(|| scorer.score(&request))) {
            Ok(scored) => scored,
            Err(_) => {
                error!("QA scorer panicked");
                return Answer::Failed("scorer panicked".into());
            }
        };
        match scored {
            Ok(ScorerOutput::Span { text, score }) if score >= self.policy.confidence_threshold => {
                Answer::Answered {
                    text,
                    confidence: score,
                }
            }
            Ok(ScorerOutput::Span { score, .. }) => Answer::LowConfidence { confidence: score },
            Ok(ScorerOutput::NoAnswer { score }) => {
                warn!(score, "scorer found no answer in context");
                Answer::NoAnswer { confidence: score }
            }
            Err(e) => {
                error!("QA error: {e}");
                Answer::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::error::{Result, WikiFitError};

    struct FixedScorer(ScorerOutput);

    impl Scorer for FixedScorer {
        fn score(&self, _request: &ScoreRequest<'_>) -> Result<ScorerOutput> {
            Ok(self.0.clone())
        }
    }

    struct EchoLimitScorer;

    impl Scorer for EchoLimitScorer {
        fn score(&self, request: &ScoreRequest<'_>) -> Result<ScorerOutput> {
            assert!(request.handle_impossible);
            Ok(ScorerOutput::Span {
                text: request.max_answer_chars.to_string(),
                score: 1.0,
            })
        }
    }

    fn span(text: &str, score: f32) -> FixedScorer {
        FixedScorer(ScorerOutput::Span {
            text: text.into(),
            score,
        })
    }

    #[test]
    fn threshold_is_inclusive() {
        let extractor = AnswerExtractor::new(span("Fiber", 0.1), AnswerPolicy::default());
        assert_eq!(
            extractor.evaluate("What aids digestion?", "..."),
            Answer::Answered {
                text: "Fiber".into(),
                confidence: 0.1
            }
        );
    }

    #[test]
    fn question_length_counts_characters_not_bytes() {
        let extractor = AnswerExtractor::new(span("ok", 0.9), AnswerPolicy::default());
        // Four characters, eight bytes.
        assert_eq!(extractor.evaluate("éééé", "ctx"), Answer::Rejected);
        assert!(extractor.evaluate("ééééé", "ctx").is_answered());
    }

    #[test]
    fn scorer_receives_policy_cap() {
        let policy = AnswerPolicy {
            max_answer_chars: 42,
            ..Default::default()
        };
        let extractor = AnswerExtractor::new(EchoLimitScorer, policy);
        assert_eq!(extractor.answer("How long may it be?", "ctx"), "42");
    }

    #[test]
    fn no_answer_renders_as_refusal() {
        let extractor = AnswerExtractor::new(
            FixedScorer(ScorerOutput::NoAnswer { score: 0.8 }),
            AnswerPolicy::default(),
        );
        assert_eq!(
            extractor.answer("What is the capital of France?", "ctx"),
            LOW_CONFIDENCE_MESSAGE
        );
    }

    #[test]
    fn custom_threshold_applies() {
        let policy = AnswerPolicy {
            confidence_threshold: 0.5,
            ..Default::default()
        };
        let extractor = AnswerExtractor::new(span("Carbohydrates", 0.4), policy);
        assert_eq!(
            extractor.evaluate("Main source of energy?", "ctx"),
            Answer::LowConfidence { confidence: 0.4 }
        );
    }

    #[test]
    fn failed_display_includes_detail() {
        let answer = Answer::Failed(WikiFitError::Scorer("boom".into()).to_string());
        assert_eq!(
            answer.to_string(),
            "Sorry, I couldn't process your question. Error: scorer error: boom"
        );
    }

    #[test]
    fn policy_from_config() {
        let config = QaConfig {
            min_question_chars: 9,
            confidence_threshold: 0.3,
            max_answer_chars: 50,
            intra_threads: 1,
        };
        let policy = AnswerPolicy::from(&config);
        assert_eq!(policy.min_question_chars, 9);
        assert_eq!(policy.max_answer_chars, 50);
    }

    #[test]
    fn extractor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnswerExtractor>();
    }
}
