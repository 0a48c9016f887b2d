//! Parsed identifier pairs and the resolved output.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::intent::{Intent, IntentPolicy};
use crate::parser::parse_provider_model;
use crate::{Result, VegvisirError};

/// A symbolic `intent/policy` request. Identifies one cache partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentPair {
    pub intent: Intent,
    pub intent_policy: IntentPolicy,
}

impl IntentPair {
    pub fn new(intent: Intent, intent_policy: IntentPolicy) -> Self {
        Self {
            intent,
            intent_policy,
        }
    }
}

impl fmt::Display for IntentPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.intent, self.intent_policy)
    }
}

/// An explicit `provider/model` request.
///
/// Only the parser constructs these, so both segments are known to be
/// non-empty and restricted to `[a-zA-Z0-9_.-]`. Serde goes through the
/// parser too: the wire form is the `"provider/model"` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderModelPair {
    pub(crate) provider: String,
    pub(crate) model: String,
}

impl ProviderModelPair {
    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TryFrom<String> for ProviderModelPair {
    type Error = VegvisirError;

    fn try_from(value: String) -> Result<Self> {
        parse_provider_model(&value)
    }
}

impl From<ProviderModelPair> for String {
    fn from(pair: ProviderModelPair) -> Self {
        pair.to_string()
    }
}

impl fmt::Display for ProviderModelPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

/// Output of the grammar parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIdentifier {
    Intent(IntentPair),
    ProviderModel(ProviderModelPair),
}

impl ParsedIdentifier {
    /// Label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedIdentifier::Intent(_) => "intent",
            ParsedIdentifier::ProviderModel(_) => "provider_model",
        }
    }
}

impl fmt::Display for ParsedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedIdentifier::Intent(pair) => pair.fmt(f),
            ParsedIdentifier::ProviderModel(pair) => pair.fmt(f),
        }
    }
}

/// The `(provider, model)` actually chosen for a request.
///
/// Built only from a validated [`ProviderModelPair`] or a candidate table
/// entry, never from free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedResponse {
    pub provider: String,
    pub model: String,
}

impl ResolvedResponse {
    pub(crate) fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

impl From<ProviderModelPair> for ResolvedResponse {
    fn from(pair: ProviderModelPair) -> Self {
        Self {
            provider: pair.provider,
            model: pair.model,
        }
    }
}

impl fmt::Display for ResolvedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    #[test]
    fn provider_model_pair_serializes_as_identifier() {
        let pair = parse_provider_model("openai/gpt-5-mini").unwrap();
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, "\"openai/gpt-5-mini\"");
        let back: ProviderModelPair = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
    }

    #[test]
    fn deserializing_invalid_pair_fails() {
        for json in [
            r#""evil provider@x/""#,
            r#""openai/""#,
            r#""no-separator""#,
            r#"{"provider":"evil provider@x","model":""}"#,
        ] {
            assert!(
                serde_json::from_str::<ProviderModelPair>(json).is_err(),
                "{json} deserialized"
            );
        }
    }

    #[test]
    fn try_from_reports_parse_kind() {
        let err = ProviderModelPair::try_from("openai/gpt 5".to_string()).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::InvalidCharacters));
    }
}
