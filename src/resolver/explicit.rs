//! Explicit `provider/model` resolution.

use crate::types::{ProviderModelPair, ResolvedResponse};

/// Turn a parsed explicit pair into the resolved response, unchanged.
///
/// The parser already guarantees both segments are non-empty and within the
/// allowed character set. Whether the provider is enabled for the caller is
/// not checked here: explicit requests pass through and any credential
/// failure surfaces at invocation time.
pub fn resolve_explicit(pair: ProviderModelPair) -> ResolvedResponse {
    ResolvedResponse::from(pair)
}
