//! Integration tests for the identifier grammar.

use vegvisir::parser::{parse, parse_intent, parse_provider_model};
use vegvisir::{Intent, IntentPolicy, ParseErrorKind, ParsedIdentifier, VegvisirError};

// =============================================================================
// Classification
// =============================================================================

#[test]
fn every_intent_and_policy_parses_as_intent_pair() {
    for intent in Intent::ALL {
        for policy in IntentPolicy::ALL {
            let input = format!("{intent}/{policy}");
            match parse(&input).unwrap() {
                ParsedIdentifier::Intent(pair) => {
                    assert_eq!(pair.intent, intent);
                    assert_eq!(pair.intent_policy, policy);
                    assert_eq!(pair.to_string(), input);
                }
                other => panic!("{input} classified as {}", other.kind()),
            }
        }
    }
}

#[test]
fn intent_match_is_case_insensitive() {
    let ParsedIdentifier::Intent(pair) = parse("Programming/Most-Popular").unwrap() else {
        panic!("expected intent pair");
    };
    assert_eq!(pair.intent, Intent::Programming);
    assert_eq!(pair.intent_policy, IntentPolicy::MostPopular);
}

#[test]
fn unknown_head_is_provider_model() {
    let ParsedIdentifier::ProviderModel(pair) = parse("openai/gpt-5-mini").unwrap() else {
        panic!("expected provider/model");
    };
    assert_eq!(pair.provider(), "openai");
    assert_eq!(pair.model(), "gpt-5-mini");
    assert_eq!(pair.to_string(), "openai/gpt-5-mini");
}

#[test]
fn provider_model_allows_dots_and_underscores() {
    let pair = parse_provider_model("amazon-bedrock/global.anthropic.claude_v1.0").unwrap();
    assert_eq!(pair.provider(), "amazon-bedrock");
    assert_eq!(pair.model(), "global.anthropic.claude_v1.0");
}

// =============================================================================
// Failures
// =============================================================================

fn kind_of(input: &str) -> ParseErrorKind {
    parse(input).unwrap_err().parse_kind().unwrap()
}

#[test]
fn missing_slash_is_bad_formatting() {
    let err = parse("gpt-5-mini").unwrap_err();
    assert!(matches!(
        err,
        VegvisirError::Parse {
            kind: ParseErrorKind::BadFormatting,
            ..
        }
    ));
    assert!(err.is_user_error());
}

#[test]
fn empty_input_is_bad_formatting() {
    assert_eq!(kind_of(""), ParseErrorKind::BadFormatting);
}

#[test]
fn known_intent_with_bad_policy_is_intent_error() {
    let err = parse("programming/cheapest").unwrap_err();
    assert!(matches!(
        err,
        VegvisirError::IntentParse {
            kind: ParseErrorKind::InvalidCharacters,
            ..
        }
    ));
}

#[test]
fn known_intent_with_empty_policy() {
    let err = parse("finance/").unwrap_err();
    assert!(matches!(
        err,
        VegvisirError::IntentParse {
            kind: ParseErrorKind::EmptyIntentPolicy,
            ..
        }
    ));
}

#[test]
fn empty_provider_and_model() {
    assert_eq!(kind_of("/gpt-5"), ParseErrorKind::EmptyProvider);
    assert_eq!(kind_of("openai/"), ParseErrorKind::EmptyModel);
}

#[test]
fn invalid_characters_in_either_segment() {
    for input in ["open ai/gpt", "openai/gpt 5", "openai/gpt@5", "open$ai/gpt", "openai/a/b"] {
        let err = parse(input).unwrap_err();
        assert!(
            matches!(
                err,
                VegvisirError::ProviderModelParse {
                    kind: ParseErrorKind::InvalidCharacters,
                    ..
                }
            ),
            "{input}: {err}"
        );
    }
}

#[test]
fn direct_entry_points_report_their_own_variant() {
    assert!(matches!(
        parse_intent("nope").unwrap_err(),
        VegvisirError::IntentParse {
            kind: ParseErrorKind::BadFormatting,
            ..
        }
    ));
    assert!(matches!(
        parse_intent("/most-popular").unwrap_err(),
        VegvisirError::IntentParse {
            kind: ParseErrorKind::EmptyIntent,
            ..
        }
    ));
    assert!(matches!(
        parse_provider_model("nope").unwrap_err(),
        VegvisirError::ProviderModelParse {
            kind: ParseErrorKind::BadFormatting,
            ..
        }
    ));
}

#[test]
fn error_message_names_the_offending_input() {
    let err = parse("openai/gpt 5").unwrap_err().to_string();
    assert!(err.contains("gpt 5"), "{err}");
}
