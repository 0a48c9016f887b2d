//! Payload shapes of the upstream data sources.
//!
//! Only the fields the resolver reads are modelled; everything else in the
//! upstream documents is ignored so schema drift does not break parsing.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Result;

/// Accept either a single object or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::<T>::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

// ============================================================================
// Ranking source (`/find?categories=..&order=..`)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RankingPayload {
    data: RankingData,
}

#[derive(Debug, Deserialize)]
struct RankingData {
    #[serde(deserialize_with = "one_or_many")]
    models: Vec<ModelSummary>,
}

/// A model descriptor as published by the ranking source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Unique slug, e.g. `anthropic/claude-sonnet-4.5`.
    pub slug: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Ordered model slugs for one `(intent, policy)` partition.
///
/// Order is authoritative and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedModelList {
    slugs: Vec<String>,
}

impl RankedModelList {
    pub fn new(slugs: Vec<String>) -> Self {
        Self { slugs }
    }

    /// Parse a cached ranking document.
    pub fn from_json(json: &str) -> Result<Self> {
        let payload: RankingPayload = serde_json::from_str(json)?;
        Ok(Self {
            slugs: payload.data.models.into_iter().map(|m| m.slug).collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.slugs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

// ============================================================================
// All-models snapshot (`/api/frontend/models`)
// ============================================================================

/// The global "all models" snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct AllModels {
    #[serde(deserialize_with = "one_or_many")]
    pub data: Vec<ModelSummary>,
}

impl AllModels {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Model metadata (models.dev `api.json`)
// ============================================================================

/// A provider entry in the model metadata catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsDevProvider {
    pub id: String,
    #[serde(default)]
    pub models: HashMap<String, ModelsDevModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsDevModel {
    pub id: String,
}

/// Provider id → provider entry.
///
/// Fetched and cached alongside the rankings but not consulted by
/// resolution yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ModelsDevCatalog {
    providers: HashMap<String, ModelsDevProvider>,
}

impl ModelsDevCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn provider(&self, id: &str) -> Option<&ModelsDevProvider> {
        self.providers.get(id)
    }

    /// Whether `provider` lists `model` among its model ids.
    pub fn has_model(&self, provider: &str, model: &str) -> bool {
        self.provider(provider)
            .is_some_and(|p| p.models.values().any(|m| m.id == model))
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
