//! Model identifier grammar.
//!
//! An identifier is two segments separated by the first `/`:
//!
//! ```text
//! identifier     := intent-pair | provider-model
//! intent-pair    := INTENT "/" POLICY          (both case-insensitive)
//! provider-model := SEGMENT "/" SEGMENT        (SEGMENT = [a-zA-Z0-9_.-]+)
//! ```
//!
//! The left segment decides the branch: if it names a known [`Intent`] the
//! whole identifier must be an intent pair, otherwise it is read as an
//! explicit provider/model pair.

use crate::error::ParseErrorKind;
use crate::types::{Intent, IntentPair, IntentPolicy, ParsedIdentifier, ProviderModelPair};
use crate::{Result, VegvisirError};

/// Classify and validate a model identifier.
///
/// ```rust
/// # use vegvisir::parser::parse;
/// # use vegvisir::{Intent, IntentPolicy, ParsedIdentifier};
/// let parsed = parse("programming/most-popular").unwrap();
/// assert!(matches!(
///     parsed,
///     ParsedIdentifier::Intent(p) if p.intent == Intent::Programming
///         && p.intent_policy == IntentPolicy::MostPopular
/// ));
///
/// let parsed = parse("openai/gpt-5-mini").unwrap();
/// assert!(matches!(parsed, ParsedIdentifier::ProviderModel(_)));
/// ```
pub fn parse(input: &str) -> Result<ParsedIdentifier> {
    let Some((head, _)) = input.split_once('/') else {
        return Err(VegvisirError::Parse {
            kind: ParseErrorKind::BadFormatting,
            message: format!("expected format \"{{}}/{{}}\", got: \"{input}\""),
        });
    };

    if Intent::lookup(head).is_some() {
        parse_intent(input).map(ParsedIdentifier::Intent)
    } else {
        parse_provider_model(input).map(ParsedIdentifier::ProviderModel)
    }
}

/// Parse `intent/policy`.
pub fn parse_intent(input: &str) -> Result<IntentPair> {
    let fail = |kind, message: String| VegvisirError::IntentParse { kind, message };

    let Some((intent, policy)) = input.split_once('/') else {
        return Err(fail(
            ParseErrorKind::BadFormatting,
            format!("expected format \"intent/intentPolicy\", got: \"{input}\""),
        ));
    };

    if intent.is_empty() {
        return Err(fail(
            ParseErrorKind::EmptyIntent,
            format!("intent must be non-empty, got: \"{input}\""),
        ));
    }
    if policy.is_empty() {
        return Err(fail(
            ParseErrorKind::EmptyIntentPolicy,
            format!("intent policy must be non-empty, got: \"{input}\""),
        ));
    }

    let Some(intent) = Intent::lookup(intent) else {
        return Err(fail(
            ParseErrorKind::InvalidCharacters,
            format!("intent contains invalid literal, got: \"{intent}\""),
        ));
    };
    let Some(intent_policy) = IntentPolicy::lookup(policy) else {
        return Err(fail(
            ParseErrorKind::InvalidCharacters,
            format!("intent policy contains invalid literal, got: \"{policy}\""),
        ));
    };

    Ok(IntentPair::new(intent, intent_policy))
}

/// Parse `provider/model`.
pub fn parse_provider_model(input: &str) -> Result<ProviderModelPair> {
    let fail = |kind, message: String| VegvisirError::ProviderModelParse { kind, message };

    let Some((provider, model)) = input.split_once('/') else {
        return Err(fail(
            ParseErrorKind::BadFormatting,
            format!("expected format \"provider/model\", got: \"{input}\""),
        ));
    };

    if provider.is_empty() {
        return Err(fail(
            ParseErrorKind::EmptyProvider,
            format!("provider must be non-empty, got: \"{input}\""),
        ));
    }
    if model.is_empty() {
        return Err(fail(
            ParseErrorKind::EmptyModel,
            format!("model must be non-empty, got: \"{input}\""),
        ));
    }
    if !is_valid_segment(provider) {
        return Err(fail(
            ParseErrorKind::InvalidCharacters,
            format!(
                "provider contains invalid characters (only alphanumeric, underscore, dot, and hyphen allowed), got: \"{provider}\""
            ),
        ));
    }
    if !is_valid_segment(model) {
        return Err(fail(
            ParseErrorKind::InvalidCharacters,
            format!(
                "model contains invalid characters (only alphanumeric, underscore, dot, and hyphen allowed), got: \"{model}\""
            ),
        ));
    }

    Ok(ProviderModelPair {
        provider: provider.to_string(),
        model: model.to_string(),
    })
}

/// `^[a-zA-Z0-9_.-]+$`
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_separator_is_bad_formatting() {
        let err = parse("gpt-4o").unwrap_err();
        assert!(matches!(err, VegvisirError::Parse { .. }));
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::BadFormatting));
    }

    #[test]
    fn empty_input_is_bad_formatting() {
        assert_eq!(
            parse("").unwrap_err().parse_kind(),
            Some(ParseErrorKind::BadFormatting)
        );
    }

    #[test]
    fn intent_head_is_case_insensitive() {
        let parsed = parse("PROGRAMMING/Pricing-Low-To-High").unwrap();
        assert_eq!(
            parsed,
            ParsedIdentifier::Intent(IntentPair::new(
                Intent::Programming,
                IntentPolicy::PricingLowToHigh
            ))
        );
    }

    #[test]
    fn intent_with_unknown_policy_fails_as_intent_error() {
        let err = parse("finance/cheapest").unwrap_err();
        assert!(matches!(err, VegvisirError::IntentParse { .. }));
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::InvalidCharacters));
    }

    #[test]
    fn intent_with_empty_policy() {
        let err = parse("finance/").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::EmptyIntentPolicy));
    }

    #[test]
    fn parse_intent_rejects_empty_intent() {
        let err = parse_intent("/most-popular").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::EmptyIntent));
    }

    #[test]
    fn split_happens_at_first_slash() {
        let err = parse("openai/gpt/4").unwrap_err();
        assert!(matches!(err, VegvisirError::ProviderModelParse { .. }));
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::InvalidCharacters));
    }

    #[test]
    fn empty_leading_segment_is_empty_provider() {
        let err = parse("/gpt-4o").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::EmptyProvider));
    }

    #[test]
    fn segment_charset() {
        assert!(is_valid_segment("amazon-bedrock"));
        assert!(is_valid_segment("gpt-5.2_codex"));
        assert!(!is_valid_segment(""));
        assert!(!is_valid_segment("a b"));
        assert!(!is_valid_segment("user@host"));
        assert!(!is_valid_segment("eu.anthropic.claude:0"));
    }
}
