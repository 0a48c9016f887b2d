//! Resolve orchestrator.
//!
//! Dispatches a parsed identifier to the intent or explicit resolver:
//!
//! ```text
//! resolve("programming/most-popular", enabled)
//!          │
//!          ▼
//!     parser::parse ──── error ──► Parse / IntentParse / ProviderModelParse
//!          │
//!    ┌─────┴──────────────┐
//!    ▼                    ▼
//! IntentPair         ProviderModelPair
//!    │                    │
//! resolve_intent     resolve_explicit
//!  (snapshot →            │
//!   candidates →          │
//!   enabled filter)       │
//!    └─────────┬──────────┘
//!              ▼
//!       ResolvedResponse
//! ```

mod builder;
mod explicit;
mod intent;

pub use builder::ResolverBuilder;
pub use explicit::resolve_explicit;
pub use intent::{resolve_intent, select_candidate};

use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::data::DataManager;
use crate::parser;
use crate::tables::CandidateTable;
use crate::telemetry;
use crate::types::{ParsedIdentifier, ResolvedResponse};
use crate::{Result, VegvisirError};

/// Resolves model identifiers to a usable `(provider, model)` pair.
///
/// ```rust,no_run
/// use std::collections::HashSet;
/// use vegvisir::Resolver;
///
/// #[tokio::main]
/// async fn main() -> vegvisir::Result<()> {
///     let resolver = Resolver::builder().build()?;
///     let enabled: HashSet<String> = ["openai".to_string()].into();
///
///     let resolved = resolver.resolve("programming/most-popular", &enabled).await?;
///     println!("{}/{}", resolved.provider, resolved.model);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Resolver {
    data: Arc<DataManager>,
    table: Arc<CandidateTable>,
}

impl Resolver {
    /// Create a new builder.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub fn new(data: Arc<DataManager>, table: Arc<CandidateTable>) -> Self {
        Self { data, table }
    }

    pub fn data(&self) -> &DataManager {
        &self.data
    }

    pub fn candidates(&self) -> &CandidateTable {
        &self.table
    }

    /// Resolve `model` for a caller with the given enabled providers.
    #[instrument(skip(self, enabled_providers), fields(enabled = enabled_providers.len()))]
    pub async fn resolve(
        &self,
        model: &str,
        enabled_providers: &HashSet<String>,
    ) -> Result<ResolvedResponse> {
        let parsed = match parser::parse(model) {
            Ok(parsed) => parsed,
            Err(e) => {
                record("unparsed", false);
                return Err(e);
            }
        };
        let kind = parsed.kind();

        let result = match parsed {
            ParsedIdentifier::Intent(pair) => {
                resolve_intent(&self.data, &self.table, &pair, enabled_providers).await
            }
            ParsedIdentifier::ProviderModel(pair) => Ok(resolve_explicit(pair)),
        };
        record(kind, result.is_ok());
        result
    }

    /// Resolve a wire-level `model` field, which must be a JSON string.
    pub async fn resolve_value(
        &self,
        model: &serde_json::Value,
        enabled_providers: &HashSet<String>,
    ) -> Result<ResolvedResponse> {
        match model {
            serde_json::Value::String(s) => self.resolve(s, enabled_providers).await,
            other => Err(VegvisirError::InvalidModelType(format!(
                "expected model to be a string, got {}",
                json_type_name(other)
            ))),
        }
    }
}

fn record(kind: &'static str, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::RESOLUTIONS_TOTAL, "kind" => kind, "status" => status)
        .increment(1);
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&serde_json::json!(42)), "number");
        assert_eq!(json_type_name(&serde_json::json!(["a"])), "array");
        assert_eq!(json_type_name(&serde_json::json!({"m": 1})), "object");
        assert_eq!(json_type_name(&serde_json::Value::Null), "null");
    }
}
