//! Vegvisir error types

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Why a model identifier failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No `/` separator present.
    BadFormatting,
    /// Intent segment is empty.
    EmptyIntent,
    /// Intent policy segment is empty.
    EmptyIntentPolicy,
    /// Provider segment is empty.
    EmptyProvider,
    /// Model segment is empty.
    EmptyModel,
    /// A segment contains characters (or a literal) outside the grammar.
    InvalidCharacters,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadFormatting => "BadFormatting",
            Self::EmptyIntent => "EmptyIntent",
            Self::EmptyIntentPolicy => "EmptyIntentPolicy",
            Self::EmptyProvider => "EmptyProvider",
            Self::EmptyModel => "EmptyModel",
            Self::InvalidCharacters => "InvalidCharacters",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vegvisir error types
#[derive(Debug, thiserror::Error)]
pub enum VegvisirError {
    // Grammar errors
    #[error("parse error ({kind}): {message}")]
    Parse {
        kind: ParseErrorKind,
        message: String,
    },

    #[error("intent parse error ({kind}): {message}")]
    IntentParse {
        kind: ParseErrorKind,
        message: String,
    },

    #[error("provider/model parse error ({kind}): {message}")]
    ProviderModelParse {
        kind: ParseErrorKind,
        message: String,
    },

    #[error("invalid intent: {0}")]
    InvalidIntent(String),

    /// Resolution found ranked candidates but none of their providers is
    /// enabled. `providers` lists every provider that would have worked.
    #[error("{}", no_provider_message(.request, .providers))]
    NoProviderAvailable {
        request: String,
        providers: Vec<String>,
    },

    #[error("invalid model type: {0}")]
    InvalidModelType(String),

    // Fetch/transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}) from {url}")]
    Api { status: u16, url: String },

    #[error("fetch of {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    // Cache errors
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cache error: {0}")]
    Cache(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

fn no_provider_message(request: &str, providers: &[String]) -> String {
    if providers.is_empty() {
        format!("no provider available for {request}: no ranked model has a known provider")
    } else {
        format!(
            "no provider available for {request}; configure one of: {}",
            providers.join(", ")
        )
    }
}

impl VegvisirError {
    /// Whether the error stems from the caller's input (never retried).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            VegvisirError::Parse { .. }
                | VegvisirError::IntentParse { .. }
                | VegvisirError::ProviderModelParse { .. }
                | VegvisirError::InvalidIntent(_)
                | VegvisirError::NoProviderAvailable { .. }
                | VegvisirError::InvalidModelType(_)
        )
    }

    /// The parse failure reason, for any of the three grammar errors.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            VegvisirError::Parse { kind, .. }
            | VegvisirError::IntentParse { kind, .. }
            | VegvisirError::ProviderModelParse { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VegvisirError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for VegvisirError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            VegvisirError::Api {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            VegvisirError::Http(err.to_string())
        }
    }
}

/// Result type alias for Vegvisir operations
pub type Result<T> = std::result::Result<T, VegvisirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_provider_message_names_providers() {
        let err = VegvisirError::NoProviderAvailable {
            request: "programming/most-popular".to_string(),
            providers: vec!["openai".to_string(), "anthropic".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("programming/most-popular"));
        assert!(msg.contains("configure one of: openai, anthropic"));
    }

    #[test]
    fn no_provider_message_without_candidates() {
        let err = VegvisirError::NoProviderAvailable {
            request: "seo/most-popular".to_string(),
            providers: vec![],
        };
        assert!(err.to_string().contains("no ranked model has a known provider"));
    }

    #[test]
    fn user_errors_are_classified() {
        let parse = VegvisirError::Parse {
            kind: ParseErrorKind::BadFormatting,
            message: "x".into(),
        };
        assert!(parse.is_user_error());
        assert_eq!(parse.parse_kind(), Some(ParseErrorKind::BadFormatting));
        assert!(VegvisirError::InvalidModelType("number".into()).is_user_error());
        assert!(!VegvisirError::Http("boom".into()).is_user_error());
        assert!(VegvisirError::Cache("x".into()).parse_kind().is_none());
    }
}
