//! Core types: source identifiers, search terms and the uniform result model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::adapter::failure_result;
use crate::error::SourceError;

/// The nine Wikimedia content services WikiFit reads from.
///
/// Declaration order is the canonical order: [`AggregatedResult`] iterates
/// and serialises in this order regardless of which call finished first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Encyclopedia article summaries (REST API).
    Wikipedia,
    /// Dictionary definitions.
    Wiktionary,
    /// Quotations.
    Wikiquote,
    /// How-to and textbook content.
    Wikibooks,
    /// Media files (images).
    Commons,
    /// Source texts (search snippets).
    Wikisource,
    /// Course and learning resources.
    Wikiversity,
    /// Taxonomy.
    Wikispecies,
    /// Structured knowledge base.
    Wikidata,
}

/// The fixed result shape each source produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// A single block of text.
    Text,
    /// A list of [`ImageDescriptor`]s.
    Images,
    /// A list of [`Snippet`]s.
    Snippets,
    /// A [`StructuredEntity`].
    Entity,
}

impl Source {
    /// Stable lowercase identifier, used as the map key and CLI argument.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Wikipedia => "wikipedia",
            Self::Wiktionary => "wiktionary",
            Self::Wikiquote => "wikiquote",
            Self::Wikibooks => "wikibooks",
            Self::Commons => "commons",
            Self::Wikisource => "wikisource",
            Self::Wikiversity => "wikiversity",
            Self::Wikispecies => "wikispecies",
            Self::Wikidata => "wikidata",
        }
    }

    /// Human-readable site name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wikipedia => "Wikipedia",
            Self::Wiktionary => "Wiktionary",
            Self::Wikiquote => "Wikiquote",
            Self::Wikibooks => "Wikibooks",
            Self::Commons => "Wikimedia Commons",
            Self::Wikisource => "Wikisource",
            Self::Wikiversity => "Wikiversity",
            Self::Wikispecies => "Wikispecies",
            Self::Wikidata => "Wikidata",
        }
    }

    /// What this source's results are called in user-facing error text.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Wikipedia => "information",
            Self::Wiktionary => "definition",
            Self::Wikiquote => "quotes",
            Self::Wikibooks => "content",
            Self::Commons => "images",
            Self::Wikisource => "texts",
            Self::Wikiversity => "resources",
            Self::Wikispecies => "species information",
            Self::Wikidata => "Wikidata",
        }
    }

    /// The shape every result from this source has.
    pub fn shape(&self) -> ResultShape {
        match self {
            Self::Commons => ResultShape::Images,
            Self::Wikisource => ResultShape::Snippets,
            Self::Wikidata => ResultShape::Entity,
            _ => ResultShape::Text,
        }
    }

    /// Fixed production endpoint for this source.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Wikipedia => "https://en.wikipedia.org/api/rest_v1",
            Self::Wiktionary => "https://en.wiktionary.org/w/api.php",
            Self::Wikiquote => "https://en.wikiquote.org/w/api.php",
            Self::Wikibooks => "https://en.wikibooks.org/w/api.php",
            Self::Commons => "https://commons.wikimedia.org/w/api.php",
            Self::Wikisource => "https://en.wikisource.org/w/api.php",
            Self::Wikiversity => "https://en.wikiversity.org/w/api.php",
            Self::Wikispecies => "https://species.wikimedia.org/w/api.php",
            Self::Wikidata => "https://www.wikidata.org/w/api.php",
        }
    }

    /// Resolve the endpoint, re-rooting it at `base` when one is given.
    ///
    /// With a base the endpoint becomes `<base>/<id>`, which lets a single
    /// mock server stand in for all nine services.
    pub fn endpoint(&self, base: Option<&str>) -> String {
        match base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), self.id()),
            None => self.default_endpoint().to_owned(),
        }
    }

    /// Returns all sources in canonical order.
    pub fn all() -> &'static [Source] {
        &[
            Self::Wikipedia,
            Self::Wiktionary,
            Self::Wikiquote,
            Self::Wikibooks,
            Self::Commons,
            Self::Wikisource,
            Self::Wikiversity,
            Self::Wikispecies,
            Self::Wikidata,
        ]
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|source| source.id() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::all().iter().map(Source::id).collect();
                format!("unknown source '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// A normalised lookup key shared by every source.
///
/// Normalisation trims surrounding whitespace and joins words with `_`, the
/// way wiki page titles are written. It is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Normalise a raw user-supplied term.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().replace(' ', "_"))
    }

    /// The normalised term.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalisation left nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A media file found on Wikimedia Commons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// File title without the `File:` namespace prefix.
    pub title: String,
    /// 300px-wide thumbnail URL. Never empty.
    pub thumbnail_url: String,
    /// Description with paragraph markup removed. May be empty.
    pub description: String,
}

/// A search hit from Wikisource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Page title.
    pub title: String,
    /// Matching excerpt with search-highlight markup removed.
    pub snippet: String,
}

/// One allow-listed Wikidata property and its linked entity ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProperty {
    /// Human-readable property name, e.g. `symptoms`.
    pub name: String,
    /// Raw linked entity ids (`Q…`), unresolved.
    pub values: Vec<String>,
}

/// Structured health data for the best-matching Wikidata entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredEntity {
    /// English label, or `No label`.
    pub label: String,
    /// English description, or `No description`.
    pub description: String,
    /// Allow-listed properties present on the entity, in allow-list order.
    pub properties: Vec<EntityProperty>,
}

impl StructuredEntity {
    /// Look up a property's values by its human-readable name.
    pub fn property(&self, name: &str) -> Option<&[String]> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.values.as_slice())
    }
}

/// The normalised output of one source for one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceResult {
    /// Summary-style text.
    Text(String),
    /// Media search results.
    Images(Vec<ImageDescriptor>),
    /// Text search results.
    Snippets(Vec<Snippet>),
    /// Structured knowledge-base entry.
    Entity(StructuredEntity),
    /// A user-presentable message standing in for text or entity content.
    Error(String),
}

impl SourceResult {
    /// Whether this is an error message rather than content.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The shape of this value, or `None` for [`SourceResult::Error`].
    pub fn shape(&self) -> Option<ResultShape> {
        match self {
            Self::Text(_) => Some(ResultShape::Text),
            Self::Images(_) => Some(ResultShape::Images),
            Self::Snippets(_) => Some(ResultShape::Snippets),
            Self::Entity(_) => Some(ResultShape::Entity),
            Self::Error(_) => None,
        }
    }

    /// Whether a result of this value's shape may come from `source`.
    ///
    /// `Error` fits text and entity sources; list sources express failure as
    /// an empty list instead.
    pub fn fits(&self, source: Source) -> bool {
        match self.shape() {
            Some(shape) => shape == source.shape(),
            None => matches!(source.shape(), ResultShape::Text | ResultShape::Entity),
        }
    }
}

/// Results from all nine sources for one term.
///
/// Every [`Source`] always has an entry; a failed source holds its error
/// message or an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// The normalised term every source was queried with.
    pub term: SearchTerm,
    results: BTreeMap<Source, SourceResult>,
}

impl AggregatedResult {
    /// Assemble an aggregate from per-source results.
    ///
    /// The first result given for a source wins. Sources with no result are
    /// filled with their failure value so all nine keys are present.
    pub fn from_results<I>(term: SearchTerm, results: I) -> Self
    where
        I: IntoIterator<Item = (Source, SourceResult)>,
    {
        let mut map = BTreeMap::new();
        for (source, result) in results {
            map.entry(source).or_insert(result);
        }
        for source in Source::all() {
            map.entry(*source).or_insert_with(|| {
                failure_result(
                    *source,
                    &term,
                    &SourceError::Internal("source was not queried".into()),
                )
            });
        }
        Self { term, results: map }
    }

    /// The result for one source.
    pub fn get(&self, source: Source) -> Option<&SourceResult> {
        self.results.get(&source)
    }

    /// Iterate over all results in canonical source order.
    pub fn iter(&self) -> impl Iterator<Item = (Source, &SourceResult)> {
        self.results.iter().map(|(source, result)| (*source, result))
    }

    /// Number of entries (always nine).
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Sources whose result is an error message.
    pub fn failed_sources(&self) -> Vec<Source> {
        self.iter()
            .filter(|(_, result)| result.is_error())
            .map(|(source, _)| source)
            .collect()
    }
}
