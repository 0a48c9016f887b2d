//! Public types for the Vegvisir API.

mod intent;
mod pair;

pub use intent::{Intent, IntentPolicy};
pub use pair::{IntentPair, ParsedIdentifier, ProviderModelPair, ResolvedResponse};
