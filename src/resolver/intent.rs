//! Intent resolution: ranked slugs → candidate table → first enabled provider.

use std::collections::HashSet;

use tracing::debug;

use crate::data::DataManager;
use crate::tables::CandidateTable;
use crate::types::{IntentPair, ResolvedResponse};
use crate::{Result, VegvisirError};

/// Pick the first candidate whose provider is enabled.
///
/// Slugs are scanned in rank order and candidates within a slug in table
/// order; slugs missing from the table are skipped. On exhaustion returns the
/// distinct providers seen across all considered candidates, in first-seen
/// order.
pub fn select_candidate<'a, I>(
    ranked: I,
    table: &CandidateTable,
    enabled_providers: &HashSet<String>,
) -> std::result::Result<ResolvedResponse, Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<String> = Vec::new();

    for slug in ranked {
        let Some(candidates) = table.get(slug) else {
            debug!(slug, "ranked model has no candidates, skipping");
            continue;
        };
        for candidate in candidates {
            if enabled_providers.contains(&candidate.provider) {
                return Ok(ResolvedResponse::new(&candidate.provider, &candidate.model));
            }
            if !seen.contains(&candidate.provider) {
                seen.push(candidate.provider.clone());
            }
        }
    }

    Err(seen)
}

/// Resolve an intent pair against the current snapshot.
pub async fn resolve_intent(
    data: &DataManager,
    table: &CandidateTable,
    pair: &IntentPair,
    enabled_providers: &HashSet<String>,
) -> Result<ResolvedResponse> {
    let ranked = data.ranked_models(pair).await?;

    match select_candidate(ranked.iter(), table, enabled_providers) {
        Ok(resolved) => {
            debug!(%pair, %resolved, "intent resolved");
            Ok(resolved)
        }
        Err(providers) => Err(VegvisirError::NoProviderAvailable {
            request: pair.to_string(),
            providers,
        }),
    }
}
