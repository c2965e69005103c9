//! Wikimedia Commons: image search in two steps.
//!
//! 1. `list=search` in the File namespace collects candidate titles.
//! 2. `prop=imageinfo` resolves those titles to thumbnails and descriptions.
//!
//! Either step failing yields no images at all; a half-resolved list is
//! never returned.

use serde_json::Value;

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::http;
use crate::types::{ImageDescriptor, SearchTerm, Source, SourceResult};

use super::wire::ActionResponse;

/// MediaWiki File namespace.
const FILE_NAMESPACE: &str = "6";

/// Requested thumbnail width in pixels.
const THUMBNAIL_WIDTH: &str = "300";

/// Commons media-search adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommonsAdapter {
    limit: Option<usize>,
}

impl CommonsAdapter {
    /// Override the configured result limit for this adapter.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    fn effective_limit(&self, config: &SourcesConfig) -> usize {
        self.limit.unwrap_or(config.image_limit)
    }
}

impl SourceAdapter for CommonsAdapter {
    async fn query(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> Result<SourceResult, SourceError> {
        tracing::trace!(term = %term, "Commons image search");

        let client = http::build_client(config)?;
        let endpoint = Source::Commons.endpoint(config.endpoint_base.as_deref());

        // Files whose depicts (P180) statement names the term.
        let search = format!("{term} haswbstatement:P180={term}");
        let limit = self.effective_limit(config).to_string();
        let found: ActionResponse = http::get_json(
            &client,
            &endpoint,
            &[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", &search),
                ("srnamespace", FILE_NAMESPACE),
                ("srlimit", &limit),
            ],
        )
        .await?;

        let titles: Vec<&str> = found
            .query
            .search
            .iter()
            .filter_map(|hit| hit.title.as_deref())
            .collect();
        if titles.is_empty() {
            tracing::debug!("Commons search returned no files");
            return Ok(SourceResult::Images(Vec::new()));
        }

        let joined = titles.join("|");
        let info: ActionResponse = http::get_json(
            &client,
            &endpoint,
            &[
                ("action", "query"),
                ("format", "json"),
                ("titles", &joined),
                ("prop", "imageinfo"),
                ("iiprop", "url|extmetadata"),
                ("iiurlwidth", THUMBNAIL_WIDTH),
            ],
        )
        .await?;

        let images = parse_images(&info);
        tracing::debug!(count = images.len(), "Commons images parsed");
        Ok(SourceResult::Images(images))
    }

    fn source(&self) -> Source {
        Source::Commons
    }
}

/// Turn an `imageinfo` response into descriptors, in response order.
///
/// Pages without image info or without a thumbnail URL are dropped.
fn parse_images(response: &ActionResponse) -> Vec<ImageDescriptor> {
    response
        .query
        .pages
        .values()
        .filter_map(image_from_page)
        .collect()
}

fn image_from_page(page: &Value) -> Option<ImageDescriptor> {
    let info = page.get("imageinfo")?.as_array()?.first()?;

    let thumbnail_url = info.get("thumburl").and_then(Value::as_str).unwrap_or_default();
    if thumbnail_url.is_empty() {
        return None;
    }

    let title = page
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .replace("File:", "");
    let description = info
        .pointer("/extmetadata/ImageDescription/value")
        .and_then(Value::as_str)
        .map(strip_paragraphs)
        .unwrap_or_default();

    Some(ImageDescriptor {
        title,
        thumbnail_url: thumbnail_url.to_owned(),
        description,
    })
}

/// Remove `<p>` and `</p>` tags.
fn strip_paragraphs(html: &str) -> String {
    html.replace("<p>", "").replace("</p>", "")
}
