//! Candidate table: ranked model slug to concrete `(provider, model)` options.
//!
//! The ranking source speaks in its own model slugs (`openai/gpt-5-mini`),
//! which are not directly invocable. This table maps each slug to the
//! provider-specific model ids that serve it, in hand-curated preference
//! order. Candidate order is significant and is never re-sorted.
//!
//! The table is necessarily incomplete relative to the ranking source;
//! slugs without an entry are skipped during resolution.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;

/// One concrete way to serve a ranked model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub provider: String,
    pub model: String,
}

impl Candidate {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

/// On-disk shape of one table entry.
#[derive(Debug, Deserialize)]
struct RawEntry {
    slug: String,
    candidates: Vec<Candidate>,
}

/// Read-only mapping from ranked slug to ordered candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidateTable {
    entries: HashMap<String, Vec<Candidate>>,
}

impl CandidateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(slug, candidates)` pairs.
    ///
    /// A repeated slug replaces the earlier entry.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Candidate>)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(slug, candidates)| (slug.into(), candidates))
                .collect(),
        }
    }

    /// Parse a table from its JSON form:
    /// `[{ "slug": "...", "candidates": [{ "provider": "...", "model": "..." }] }]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(
            raw.into_iter().map(|e| (e.slug, e.candidates)),
        ))
    }

    /// The compiled-in table, parsed once on first use.
    pub fn builtin() -> &'static CandidateTable {
        &BUILTIN
    }

    /// Candidates for a ranked slug, in preference order.
    pub fn get(&self, slug: &str) -> Option<&[Candidate]> {
        self.entries.get(slug).map(Vec::as_slice)
    }

    /// All slugs with an entry (unordered).
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of slugs in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static BUILTIN: LazyLock<CandidateTable> = LazyLock::new(|| {
    CandidateTable::from_json(EMBEDDED_CANDIDATES).unwrap_or_else(|e| {
        // An empty table still resolves explicit identifiers.
        warn!(error = %e, "failed to parse embedded candidate table");
        CandidateTable::new()
    })
});

/// Raw JSON table compiled into the binary.
const EMBEDDED_CANDIDATES: &str = include_str!("candidates.json");
