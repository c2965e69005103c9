//! # wikifit
//!
//! Health and fitness knowledge drawn from nine Wikimedia services, plus
//! extractive question answering over curated passages.
//!
//! The aggregation layer lives in the `wikifit-sources` workspace crate and
//! is re-exported here. This crate adds:
//!
//! - [`qa`]: a confidence-gated [`AnswerExtractor`] around an ONNX
//!   DistilBERT SQuAD scorer
//! - [`topics`]: the context passages questions are answered from
//! - [`bmi`]: a BMI calculator
//! - [`config`]: TOML configuration for both layers

pub mod bmi;
pub mod config;
pub mod error;
pub mod qa;
pub mod topics;

pub use config::{QaConfig, WikiFitConfig};
pub use error::{Result, WikiFitError};
pub use qa::{Answer, AnswerExtractor, AnswerPolicy};
pub use topics::Topic;

pub use wikifit_sources as sources;
pub use wikifit_sources::{AggregatedResult, SearchTerm, Source, SourceResult, SourcesConfig};
