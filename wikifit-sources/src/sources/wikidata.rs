//! Wikidata: structured health facts for the best-matching entity.
//!
//! Two lookups: `wbsearchentities` picks the entity (first hit wins), then
//! `wbgetentities` fetches its label, description and claims. Only claims in
//! [`HEALTH_PROPERTIES`] are reported, as raw `Q…` ids.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::adapter::SourceAdapter;
use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::http;
use crate::types::{EntityProperty, SearchTerm, Source, SourceResult, StructuredEntity};

/// Health-relevant property ids and their display names, in report order.
pub const HEALTH_PROPERTIES: &[(&str, &str)] = &[
    ("P2175", "medical condition treated"),
    ("P2176", "drug used for treatment"),
    ("P780", "symptoms"),
    ("P1050", "medical condition"),
    ("P1995", "health specialty"),
];

/// Wikidata structured-entity adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikidataAdapter;

#[derive(Debug, Deserialize)]
struct EntitySearch {
    #[serde(default)]
    search: Vec<EntityHit>,
}

#[derive(Debug, Deserialize)]
struct EntityHit {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EntityDocuments {
    #[serde(default)]
    entities: Map<String, Value>,
}

impl SourceAdapter for WikidataAdapter {
    async fn query(
        &self,
        term: &SearchTerm,
        config: &SourcesConfig,
    ) -> Result<SourceResult, SourceError> {
        tracing::trace!(term = %term, "Wikidata entity search");

        let client = http::build_client(config)?;
        let endpoint = Source::Wikidata.endpoint(config.endpoint_base.as_deref());

        let found: EntitySearch = http::get_json(
            &client,
            &endpoint,
            &[
                ("action", "wbsearchentities"),
                ("format", "json"),
                ("search", term.as_str()),
                ("language", "en"),
            ],
        )
        .await?;

        let hit = found
            .search
            .first()
            .ok_or_else(|| SourceError::NotFound(term.to_string()))?;
        let id = hit
            .id
            .as_deref()
            .ok_or_else(|| SourceError::Empty("first search hit has no id".into()))?;
        tracing::debug!(entity = id, "Wikidata entity selected");

        let documents: EntityDocuments = http::get_json(
            &client,
            &endpoint,
            &[
                ("action", "wbgetentities"),
                ("format", "json"),
                ("ids", id),
                ("languages", "en"),
            ],
        )
        .await?;

        let entity = documents
            .entities
            .get(id)
            .ok_or_else(|| SourceError::Empty(format!("entity {id} missing from response")))?;
        Ok(SourceResult::Entity(parse_entity(entity)))
    }

    fn source(&self) -> Source {
        Source::Wikidata
    }
}

fn parse_entity(entity: &Value) -> StructuredEntity {
    let label = entity
        .pointer("/labels/en/value")
        .and_then(Value::as_str)
        .unwrap_or("No label")
        .to_owned();
    let description = entity
        .pointer("/descriptions/en/value")
        .and_then(Value::as_str)
        .unwrap_or("No description")
        .to_owned();

    let properties = match entity.get("claims").and_then(Value::as_object) {
        Some(claims) => health_properties(claims),
        None => Vec::new(),
    };

    StructuredEntity {
        label,
        description,
        properties,
    }
}

/// Allow-listed properties with at least one entity-valued claim.
fn health_properties(claims: &Map<String, Value>) -> Vec<EntityProperty> {
    HEALTH_PROPERTIES
        .iter()
        .filter_map(|(pid, name)| {
            let statements = claims.get(*pid)?.as_array()?;
            let values: Vec<String> = statements.iter().filter_map(linked_entity_id).collect();
            if values.is_empty() {
                return None;
            }
            Some(EntityProperty {
                name: (*name).to_owned(),
                values,
            })
        })
        .collect()
}

/// The `Q…` id of a claim whose main snak links to another item.
fn linked_entity_id(claim: &Value) -> Option<String> {
    let snak = claim.get("mainsnak")?;
    if snak.get("datatype").and_then(Value::as_str) != Some("wikibase-item") {
        return None;
    }
    snak.pointer("/datavalue/value/id")
        .and_then(Value::as_str)
        .map(str::to_owned)
}
