//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `vegvisir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).

/// Total resolutions through the orchestrator.
///
/// Labels: `kind` ("intent" | "provider_model" | "unparsed"), `status` ("ok" | "error").
pub const RESOLUTIONS_TOTAL: &str = "vegvisir_resolutions_total";

/// Total full cache refreshes.
///
/// Labels: `status` ("ok" | "error").
pub const CACHE_REFRESHES_TOTAL: &str = "vegvisir_cache_refreshes_total";

/// Duration of a single upstream fetch in seconds.
///
/// Labels: `source` ("ranking" | "models_dev" | "all_models").
pub const FETCH_DURATION_SECONDS: &str = "vegvisir_fetch_duration_seconds";

/// Ranked lists served from the in-memory memo.
pub const RANKED_CACHE_HITS_TOTAL: &str = "vegvisir_ranked_cache_hits_total";

/// Ranked lists read from disk.
pub const RANKED_CACHE_MISSES_TOTAL: &str = "vegvisir_ranked_cache_misses_total";
