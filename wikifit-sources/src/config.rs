//! Source configuration with sensible defaults.
//!
//! [`SourcesConfig`] controls timeouts, caching and the media result limit.
//! The source set, their endpoints and the Wikidata allow-list are fixed
//! constants and are not configurable here.

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Configuration shared by all source adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Per-request HTTP timeout in seconds. A timed-out request is treated
    /// like any other transport failure.
    pub timeout_seconds: u64,
    /// How long to cache results in seconds. Set to 0 to disable caching.
    pub cache_ttl_seconds: u64,
    /// Maximum number of Commons search hits to resolve into images.
    pub image_limit: usize,
    /// Custom User-Agent string. If `None`, a descriptive
    /// `wikifit/<version>` agent is sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Re-roots every endpoint at `<base>/<source-id>`. Test-only; never
    /// read from a config file.
    #[serde(skip)]
    pub endpoint_base: Option<String>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            cache_ttl_seconds: 3600,
            image_limit: 5,
            user_agent: None,
            endpoint_base: None,
        }
    }
}

impl SourcesConfig {
    /// Configuration pointing every source at a mock server, with caching off.
    pub fn for_mock_server(base: impl Into<String>) -> Self {
        Self {
            cache_ttl_seconds: 0,
            timeout_seconds: 5,
            endpoint_base: Some(base.into()),
            ..Default::default()
        }
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `image_limit` must be greater than 0
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.timeout_seconds == 0 {
            return Err(SourceError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.image_limit == 0 {
            return Err(SourceError::Config(
                "image_limit must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Whether results should be cached.
    pub fn caching_enabled(&self) -> bool {
        self.cache_ttl_seconds > 0
    }
}
