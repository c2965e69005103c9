//! Shared HTTP client and JSON GET helper for Wikimedia API requests.
//!
//! Wikimedia asks API clients to identify themselves, so requests carry a
//! descriptive User-Agent rather than a browser one.

use crate::config::SourcesConfig;
use crate::error::SourceError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the default User-Agent string.
pub fn default_user_agent() -> String {
    format!(
        "wikifit/{} (health and fitness reader; reqwest)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Build a [`reqwest::Client`] configured for Wikimedia API requests.
///
/// The client has:
/// - Timeout from config (covers connect, request and body)
/// - Descriptive User-Agent (or custom if configured)
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the client cannot be constructed.
pub fn build_client(config: &SourcesConfig) -> Result<reqwest::Client, SourceError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => default_user_agent(),
    };

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SourceError::Config(format!("failed to build HTTP client: {e}")))
}

/// Issue a GET and decode a JSON body.
///
/// Status mapping: 200 decodes, 404 is [`SourceError::NotFound`], anything
/// else is [`SourceError::Status`]. Send failures (including timeouts) are
/// [`SourceError::Transport`].
///
/// # Errors
///
/// See the mapping above; an undecodable body is [`SourceError::Parse`].
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, SourceError> {
    let response = client
        .get(url)
        .query(query)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                SourceError::Transport(format!("request timed out: {e}"))
            } else {
                SourceError::Transport(format!("request failed: {e}"))
            }
        })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound(url.to_owned()));
    }
    if status != StatusCode::OK {
        return Err(SourceError::Status(status.as_u16()));
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_decode() {
            SourceError::Parse(format!("unexpected JSON: {e}"))
        } else {
            SourceError::Transport(format!("response read failed: {e}"))
        }
    })
}
