//! Tests for metrics emitted by resolution and refresh.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use vegvisir::{DataConfig, DataManager, DataSource, Resolver, Result, telemetry};

// ============================================================================
// Mock source
// ============================================================================

struct StaticSource;

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        if url.contains("/find?") {
            Ok(r#"{"data": {"models": [{"slug": "openai/gpt-5-mini"}]}}"#.to_string())
        } else {
            Ok(r#"{"data": []}"#.to_string())
        }
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum counter values for `name` whose labels include every `(key, value)`.
fn counter_total(snapshot: &SnapshotVec, name: &str, labels: &[(&str, &str)]) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            labels.iter().all(|(k, v)| {
                key.key()
                    .labels()
                    .any(|label| label.key() == *k && label.value() == *v)
            })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn intent_resolution_records_refresh_and_memo_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let dir = tempfile::tempdir().unwrap();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let data = Arc::new(DataManager::with_source(
                    DataConfig::new(dir.path()),
                    Arc::new(StaticSource),
                ));
                let resolver = Resolver::builder().data_manager(data).build().unwrap();
                let enabled: HashSet<String> = ["openai".to_string()].into();

                for _ in 0..3 {
                    resolver
                        .resolve("programming/most-popular", &enabled)
                        .await
                        .unwrap();
                }
                let _ = resolver.resolve("openai/gpt 5", &enabled).await;
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::RESOLUTIONS_TOTAL,
            &[("kind", "intent"), ("status", "ok")]
        ),
        3
    );
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::RESOLUTIONS_TOTAL,
            &[("kind", "unparsed"), ("status", "error")]
        ),
        1
    );
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::CACHE_REFRESHES_TOTAL,
            &[("status", "ok")]
        ),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::RANKED_CACHE_MISSES_TOTAL, &[]),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::RANKED_CACHE_HITS_TOTAL, &[]),
        2
    );
    assert!(has_histogram(&snapshot, telemetry::FETCH_DURATION_SECONDS));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn explicit_resolution_records_provider_model_kind() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let dir = tempfile::tempdir().unwrap();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                let resolver = Resolver::builder()
                    .cache_root(dir.path())
                    .data_source(Arc::new(StaticSource))
                    .build()
                    .unwrap();
                resolver
                    .resolve("anthropic/claude-sonnet-4-5", &HashSet::new())
                    .await
                    .unwrap();
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(
        counter_total(
            &snapshot,
            telemetry::RESOLUTIONS_TOTAL,
            &[("kind", "provider_model"), ("status", "ok")]
        ),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::CACHE_REFRESHES_TOTAL, &[]),
        0
    );
}
