//! Application configuration loaded from TOML.
//!
//! ```toml
//! [sources]
//! timeout_seconds = 10
//! cache_ttl_seconds = 3600
//! image_limit = 5
//!
//! [qa]
//! min_question_chars = 5
//! confidence_threshold = 0.1
//! max_answer_chars = 100
//! intra_threads = 2
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wikifit_sources::SourcesConfig;

use crate::error::{Result, WikiFitError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiFitConfig {
    /// Wikimedia source adapters.
    pub sources: SourcesConfig,
    /// Question answering.
    pub qa: QaConfig,
}

/// Question-answering policy and runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Questions with fewer characters than this are rejected unscored.
    pub min_question_chars: usize,
    /// Answers scoring below this are replaced by a refusal.
    pub confidence_threshold: f32,
    /// Longest answer span, in characters, the scorer may return.
    pub max_answer_chars: usize,
    /// ONNX Runtime intra-op threads.
    pub intra_threads: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            min_question_chars: 5,
            confidence_threshold: 0.1,
            max_answer_chars: 100,
            intra_threads: 2,
        }
    }
}

impl QaConfig {
    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WikiFitError::Config`] if the threshold lies outside
    /// `[0, 1]` or a count is zero.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(WikiFitError::Config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.max_answer_chars == 0 {
            return Err(WikiFitError::Config(
                "max_answer_chars must be greater than 0".into(),
            ));
        }
        if self.intra_threads == 0 {
            return Err(WikiFitError::Config(
                "intra_threads must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl WikiFitConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WikiFitError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| WikiFitError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/wikifit/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("wikifit").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("wikifit")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/wikifit-config/config.toml")
        }
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns [`WikiFitError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.sources
            .validate()
            .map_err(|e| WikiFitError::Config(e.to_string()))?;
        self.qa.validate()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WikiFitConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources.timeout_seconds, 10);
        assert_eq!(config.sources.cache_ttl_seconds, 3600);
        assert_eq!(config.qa.min_question_chars, 5);
        assert!((config.qa.confidence_threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.qa.max_answer_chars, 100);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = WikiFitConfig::default();
        config.sources.image_limit = 3;
        config.sources.user_agent = Some("test-agent/1.0".into());
        config.qa.confidence_threshold = 0.25;

        config.save_to_file(&path).expect("save");
        assert!(path.exists());

        let loaded = WikiFitConfig::from_file(&path).expect("load");
        assert_eq!(loaded.sources.image_limit, 3);
        assert_eq!(loaded.sources.user_agent.as_deref(), Some("test-agent/1.0"));
        assert!((loaded.qa.confidence_threshold - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[qa]\nmin_question_chars = 8\n").expect("write");

        let loaded = WikiFitConfig::from_file(&path).expect("load");
        assert_eq!(loaded.qa.min_question_chars, 8);
        assert_eq!(loaded.qa.max_answer_chars, 100);
        assert_eq!(loaded.sources, SourcesConfig::default());
    }

    #[test]
    fn endpoint_base_never_read_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sources]\nendpoint_base = \"http://evil\"\n").expect("write");

        let loaded = WikiFitConfig::from_file(&path).expect("load");
        assert!(loaded.sources.endpoint_base.is_none());
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = WikiFitConfig::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(WikiFitError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = WikiFitConfig::from_file(&path);
        assert!(matches!(result, Err(WikiFitError::Config(_))));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = WikiFitConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("wikifit"));
    }

    #[test]
    fn threshold_outside_unit_interval_rejected() {
        for threshold in [-0.1, 1.5] {
            let qa = QaConfig {
                confidence_threshold: threshold,
                ..Default::default()
            };
            assert!(qa.validate().is_err(), "{threshold}");
        }
        let edge = QaConfig {
            confidence_threshold: 1.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn invalid_sources_section_reported() {
        let mut config = WikiFitConfig::default();
        config.sources.timeout_seconds = 0;
        let err = config.validate().expect_err("zero timeout");
        assert!(err.to_string().contains("timeout"));
    }
}
