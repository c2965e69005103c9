//! DistilBERT SQuAD extractive QA via ONNX Runtime.
//!
//! The model is downloaded from HuggingFace Hub on first use and cached by
//! `hf-hub`.
//!
//! # Pipeline
//!
//! ```text
//! (question, context) → pair tokenizer → ONNX model → start/end logits
//!     → masked softmax → best span (p_start · p_end) → context slice
//! ```
//!
//! Only the first 384-token window of the context is scored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ort::session::{Session, SessionInputValue, SessionInputs};
use ort::value::Tensor;
use tracing::info;

use super::scorer::{ScoreRequest, Scorer, ScorerOutput};
use crate::error::{Result, WikiFitError};

/// HuggingFace repo carrying the ONNX export of the QA model.
const REPO_ID: &str = "Xenova/distilbert-base-cased-distilled-squad";

/// ONNX model filename inside the repo.
const MODEL_FILE: &str = "onnx/model.onnx";

/// Tokenizer filename inside the repo.
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Maximum token sequence length for question plus context.
const MAX_TOKENS: usize = 384;

/// Sequence id the tokenizer assigns to context tokens in a pair encoding.
const CONTEXT_SEQUENCE: usize = 1;

struct QaModel {
    session: Session,
    tokenizer: tokenizers::Tokenizer,
}

/// Extractive QA scorer backed by `distilbert-base-cased-distilled-squad`.
///
/// The ONNX session needs exclusive access per run, so the model sits behind
/// a mutex; concurrent callers are serialized.
pub struct OnnxQaScorer {
    model: Mutex<QaModel>,
}

impl std::fmt::Debug for OnnxQaScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxQaScorer")
            .field("repo", &REPO_ID)
            .field("max_tokens", &MAX_TOKENS)
            .finish_non_exhaustive()
    }
}

impl OnnxQaScorer {
    /// Load a scorer from pre-downloaded model files.
    ///
    /// # Errors
    ///
    /// Returns an error if the ONNX model or tokenizer cannot be loaded.
    pub fn new(model_path: &Path, tokenizer_path: &Path, intra_threads: usize) -> Result<Self> {
        info!("loading QA ONNX model: {}", model_path.display());
        let session = Session::builder()
            .and_then(|b| Ok(b.with_intra_threads(intra_threads)?))
            .and_then(|mut b| b.commit_from_file(model_path))
            .map_err(|e| WikiFitError::Model(format!("QA model load failed: {e}")))?;

        info!("loading QA tokenizer: {}", tokenizer_path.display());
        let mut tokenizer = tokenizers::Tokenizer::from_file(tokenizer_path)
            .map_err(|e| WikiFitError::Model(format!("QA tokenizer load failed: {e}")))?;

        // Long contexts are cut; the question is never truncated.
        let truncation = tokenizers::TruncationParams {
            max_length: MAX_TOKENS,
            strategy: tokenizers::TruncationStrategy::OnlySecond,
            ..Default::default()
        };
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| WikiFitError::Model(format!("tokenizer truncation config failed: {e}")))?;
        tokenizer.with_padding(None);

        info!("QA scorer ready (max_tokens={MAX_TOKENS})");

        Ok(Self {
            model: Mutex::new(QaModel { session, tokenizer }),
        })
    }

    /// Download the model files from HuggingFace Hub.
    ///
    /// Returns `(model_path, tokenizer_path)`. Files are cached by `hf-hub`
    /// and only downloaded on first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails.
    pub fn download_model() -> Result<(PathBuf, PathBuf)> {
        info!("downloading QA model: {REPO_ID}");
        let api = hf_hub::api::sync::Api::new()
            .map_err(|e| WikiFitError::Model(format!("HF Hub API init failed: {e}")))?;
        let repo = api.model(REPO_ID.to_owned());

        let model_path = repo
            .get(MODEL_FILE)
            .map_err(|e| WikiFitError::Model(format!("failed to download {MODEL_FILE}: {e}")))?;

        let tokenizer_path = repo.get(TOKENIZER_FILE).map_err(|e| {
            WikiFitError::Model(format!("failed to download {TOKENIZER_FILE}: {e}"))
        })?;

        Ok((model_path, tokenizer_path))
    }

    /// Download the model and create a scorer in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if download or loading fails.
    pub fn download_and_load(intra_threads: usize) -> Result<Self> {
        let (model_path, tokenizer_path) = Self::download_model()?;
        Self::new(&model_path, &tokenizer_path, intra_threads)
    }
}

impl Scorer for OnnxQaScorer {
    fn score(&self, request: &ScoreRequest<'_>) -> Result<ScorerOutput> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| WikiFitError::Scorer("QA model lock poisoned".into()))?;

        let encoding = model
            .tokenizer
            .encode((request.question, request.context), true)
            .map_err(|e| WikiFitError::Scorer(format!("tokenization failed: {e}")))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let seq_len = input_ids.len();

        let ids_tensor = Tensor::from_array(([1, seq_len], input_ids)).map_err(|e| {
            WikiFitError::Scorer(format!("failed to create input_ids tensor: {e}"))
        })?;
        let mask_tensor = Tensor::from_array(([1, seq_len], attention_mask)).map_err(|e| {
            WikiFitError::Scorer(format!("failed to create attention_mask tensor: {e}"))
        })?;

        let mut feed: HashMap<String, SessionInputValue> = HashMap::new();
        feed.insert("input_ids".to_owned(), ids_tensor.into());
        feed.insert("attention_mask".to_owned(), mask_tensor.into());

        let outputs = model
            .session
            .run(SessionInputs::from(feed))
            .map_err(|e| WikiFitError::Scorer(format!("ONNX inference failed: {e}")))?;

        // Both outputs have shape [1, seq_len].
        let start_logits = extract_logits(outputs.get("start_logits"), "start_logits", seq_len)?;
        let end_logits = extract_logits(outputs.get("end_logits"), "end_logits", seq_len)?;

        Ok(select_span(
            &start_logits,
            &end_logits,
            &encoding.get_sequence_ids(),
            encoding.get_offsets(),
            request.context,
            request.max_answer_chars,
            request.handle_impossible,
        ))
    }
}

fn extract_logits(
    value: Option<&ort::value::DynValue>,
    name: &str,
    seq_len: usize,
) -> Result<Vec<f32>> {
    let value = value.ok_or_else(|| WikiFitError::Scorer(format!("model output {name} missing")))?;
    let (_shape, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|e| WikiFitError::Scorer(format!("failed to extract {name}: {e}")))?;
    if data.len() != seq_len {
        return Err(WikiFitError::Scorer(format!(
            "{name} has {} values, expected {seq_len}",
            data.len()
        )));
    }
    Ok(data.to_vec())
}

// ---------------------------------------------------------------------------
// Span selection
// ---------------------------------------------------------------------------

/// Pick the most probable answer span from start/end logits.
///
/// Only context tokens (and the `[CLS]` null slot at index 0) take part in
/// the softmax. A span `(s, e)` needs `e >= s` and must map to at most
/// `max_answer_chars` characters of `context`.
fn select_span(
    start_logits: &[f32],
    end_logits: &[f32],
    sequence_ids: &[Option<usize>],
    offsets: &[(usize, usize)],
    context: &str,
    max_answer_chars: usize,
    handle_impossible: bool,
) -> ScorerOutput {
    let len = start_logits
        .len()
        .min(end_logits.len())
        .min(sequence_ids.len())
        .min(offsets.len());

    let allowed: Vec<bool> = (0..len)
        .map(|i| i == 0 || sequence_ids[i] == Some(CONTEXT_SEQUENCE))
        .collect();
    let p_start = masked_softmax(&start_logits[..len], &allowed);
    let p_end = masked_softmax(&end_logits[..len], &allowed);
    let null_score = if len > 0 { p_start[0] * p_end[0] } else { 0.0 };

    let context_tokens: Vec<usize> = (1..len).filter(|&i| allowed[i]).collect();

    let mut best: Option<(f32, usize, usize)> = None;
    for (pos, &s) in context_tokens.iter().enumerate() {
        let char_start = offsets[s].0;
        for &e in &context_tokens[pos..] {
            let char_end = offsets[e].1;
            let Some(text) = context.get(char_start..char_end) else {
                continue;
            };
            // Spans only grow with `e`.
            if text.chars().count() > max_answer_chars {
                break;
            }
            let score = p_start[s] * p_end[e];
            if best.is_none_or(|(top, _, _)| score > top) {
                best = Some((score, char_start, char_end));
            }
        }
    }

    match best {
        Some((score, _, _)) if handle_impossible && null_score > score => {
            ScorerOutput::NoAnswer { score: null_score }
        }
        Some((score, a, b)) => ScorerOutput::Span {
            text: context.get(a..b).unwrap_or_default().to_owned(),
            score,
        },
        None => ScorerOutput::NoAnswer { score: null_score },
    }
}

/// Softmax over the `allowed` positions; masked positions get probability 0.
fn masked_softmax(logits: &[f32], allowed: &[bool]) -> Vec<f32> {
    let max = logits
        .iter()
        .zip(allowed)
        .filter(|(_, ok)| **ok)
        .map(|(l, _)| *l)
        .fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        return vec![0.0; logits.len()];
    }

    let exps: Vec<f32> = logits
        .iter()
        .zip(allowed)
        .map(|(l, ok)| if *ok { (l - max).exp() } else { 0.0 })
        .collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
