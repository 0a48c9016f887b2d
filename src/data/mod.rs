//! Data fetch & cache manager.
//!
//! Keeps an on-disk snapshot of upstream ranking data fresh. A single
//! staleness marker governs the whole snapshot: when it is older than the
//! TTL, every partition is refetched together.
//!
//! # Refresh protocol
//!
//! ```text
//! ensure_fresh()
//!   │ read marker ── fresh ──► done
//!   │ stale
//!   ▼
//! lock refresh mutex ─► an attempt finished while waiting and failed ──► its error
//!   │
//!   ▼
//! re-read marker ── fresh ──► done (another task refreshed)
//!   │ still stale
//!   ▼
//! fetch all (bounded fan-out, per-fetch timeout)
//!   │ any failure ──► error, files + marker untouched
//!   ▼
//! recreate layout ─► clear marker ─► write every file (atomic) ─► write marker
//! ```
//!
//! Concurrent callers that observe a stale snapshot queue on the mutex and
//! share the outcome of the attempt they waited for, so one refresh runs at
//! a time and no fetch set is duplicated. The marker on disk is the only
//! freshness authority; a cleared or deleted marker always means stale.

pub mod layout;
pub mod schema;
pub mod source;

pub use layout::{CacheLayout, is_stale, now_millis};
pub use schema::{AllModels, ModelSummary, ModelsDevCatalog, RankedModelList};
pub use source::{DataEndpoints, DataSource, HttpDataSource};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures_util::{StreamExt, TryStreamExt, stream};
use moka::sync::Cache;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::telemetry;
use crate::types::{Intent, IntentPair, IntentPolicy};
use crate::{Result, VegvisirError};

use layout::{CacheState, read_marker, write_atomic};

/// Configuration for the [`DataManager`].
///
/// ```rust
/// # use vegvisir::DataConfig;
/// # use std::time::Duration;
/// let config = DataConfig::new("/tmp/vegvisir")
///     .ttl(Duration::from_secs(3600))
///     .fetch_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Cache root directory.
    pub root: PathBuf,
    /// Snapshot time-to-live. Default: 12 hours.
    pub ttl: Duration,
    /// Timeout applied to each upstream fetch. Default: 30s.
    pub fetch_timeout: Duration,
    /// Maximum fetches in flight during a refresh. Default: 32.
    pub max_concurrent_fetches: usize,
    /// Upstream endpoints.
    pub endpoints: DataEndpoints,
    /// Capacity of the in-memory ranked list memo. Default: 256.
    pub memo_capacity: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_cache_root(),
            ttl: Duration::from_secs(12 * 3600),
            fetch_timeout: Duration::from_secs(30),
            max_concurrent_fetches: 32,
            endpoints: DataEndpoints::default(),
            memo_capacity: 256,
        }
    }
}

impl DataConfig {
    /// Config with default values and the given cache root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the fan-out limit (clamped to at least 1).
    pub fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.max_concurrent_fetches = n.max(1);
        self
    }

    pub fn endpoints(mut self, endpoints: DataEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn memo_capacity(mut self, n: u64) -> Self {
        self.memo_capacity = n;
        self
    }
}

/// Default cache root: `~/.cache/vegvisir`.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("vegvisir")
}

/// Snapshot status as reported by [`DataManager::status()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub root: PathBuf,
    /// Marker value; `None` if the cache was never populated.
    pub last_fetch: Option<u64>,
    /// Time since the last refresh, if any.
    pub age: Option<Duration>,
    pub stale: bool,
}

/// What a single refresh fetch produces.
#[derive(Debug, Clone, Copy)]
enum Target {
    Ranking(IntentPair),
    ModelsDev,
    AllModels,
}

impl Target {
    fn label(&self) -> &'static str {
        match self {
            Target::Ranking(_) => "ranking",
            Target::ModelsDev => "models_dev",
            Target::AllModels => "all_models",
        }
    }
}

#[derive(Debug)]
struct FetchJob {
    target: Target,
    url: String,
    path: PathBuf,
}

/// Owns the on-disk snapshot and coordinates refreshes.
pub struct DataManager {
    config: DataConfig,
    layout: CacheLayout,
    source: Arc<dyn DataSource>,
    prepared: OnceCell<()>,
    state: Mutex<CacheState>,
    /// Mirror of `CacheState::attempts`, readable without the lock.
    attempts: AtomicU64,
    ranked: Cache<(IntentPair, u64), Arc<RankedModelList>>,
}

impl DataManager {
    /// Create a manager that fetches over HTTP.
    pub fn new(config: DataConfig) -> Result<Self> {
        let source = HttpDataSource::new(config.fetch_timeout)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Create a manager with a custom data source.
    pub fn with_source(config: DataConfig, source: Arc<dyn DataSource>) -> Self {
        let layout = CacheLayout::new(&config.root);
        let ranked = Cache::new(config.memo_capacity);
        Self {
            config,
            layout,
            source,
            prepared: OnceCell::new(),
            state: Mutex::new(CacheState::default()),
            attempts: AtomicU64::new(0),
            ranked,
        }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Make sure the snapshot is younger than the TTL, refreshing it if not.
    ///
    /// Returns the marker value of the snapshot now on disk. A caller that
    /// queued behind a failed refresh gets that failure instead of
    /// starting another one.
    pub async fn ensure_fresh(&self) -> Result<u64> {
        self.prepare().await?;

        let marker = self.layout.marker();
        let last_fetch = read_marker(&marker).await?;
        if !is_stale(now_millis(), last_fetch, self.config.ttl) {
            return Ok(last_fetch);
        }

        let observed = self.attempts.load(Ordering::Acquire);
        let mut state = self.state.lock().await;
        if state.attempts != observed
            && let Some(error) = &state.last_error
        {
            debug!(%error, "concurrent snapshot refresh failed, not retrying");
            return Err(VegvisirError::Cache(format!("snapshot refresh failed: {error}")));
        }

        // Another task may have refreshed while we waited for the lock.
        let last_fetch = read_marker(&marker).await?;
        if !is_stale(now_millis(), last_fetch, self.config.ttl) {
            debug!(last_fetch, "snapshot refreshed by a concurrent caller");
            return Ok(last_fetch);
        }

        self.refresh_locked(&mut state).await
    }

    /// Refresh the snapshot regardless of its age.
    pub async fn force_refresh(&self) -> Result<u64> {
        self.prepare().await?;
        let mut state = self.state.lock().await;
        self.refresh_locked(&mut state).await
    }

    /// Ranked model list for an intent pair, from a fresh snapshot.
    pub async fn ranked_models(&self, pair: &IntentPair) -> Result<Arc<RankedModelList>> {
        if !pair.intent.is_ranked() {
            return Err(VegvisirError::InvalidIntent(format!(
                "intent \"{}\" has no ranked model data",
                pair.intent
            )));
        }

        let stamp = self.ensure_fresh().await?;
        let key = (*pair, stamp);
        if let Some(list) = self.ranked.get(&key) {
            metrics::counter!(telemetry::RANKED_CACHE_HITS_TOTAL).increment(1);
            return Ok(list);
        }
        metrics::counter!(telemetry::RANKED_CACHE_MISSES_TOTAL).increment(1);

        let path = self.layout.ranked(pair);
        let raw = read_file(&path).await?;
        let list = Arc::new(RankedModelList::from_json(&raw).map_err(|e| {
            VegvisirError::Cache(format!("malformed ranking data in {}: {e}", path.display()))
        })?);
        debug!(%pair, models = list.len(), "loaded ranked model list");
        self.ranked.insert(key, Arc::clone(&list));
        Ok(list)
    }

    /// Model metadata catalog from a fresh snapshot.
    pub async fn models_dev(&self) -> Result<ModelsDevCatalog> {
        self.ensure_fresh().await?;
        ModelsDevCatalog::from_json(&read_file(&self.layout.models_dev()).await?)
    }

    /// All-models snapshot from a fresh snapshot.
    pub async fn all_models(&self) -> Result<AllModels> {
        self.ensure_fresh().await?;
        AllModels::from_json(&read_file(&self.layout.all_models()).await?)
    }

    /// Report the snapshot's age without refreshing it.
    pub async fn status(&self) -> Result<CacheStatus> {
        let stamp = read_marker(&self.layout.marker()).await?;
        let now = now_millis();
        let last_fetch = (stamp > 0).then_some(stamp);
        Ok(CacheStatus {
            root: self.layout.root().to_path_buf(),
            last_fetch,
            age: last_fetch.map(|s| Duration::from_millis(now.saturating_sub(s))),
            stale: is_stale(now, stamp, self.config.ttl),
        })
    }

    async fn prepare(&self) -> Result<()> {
        self.prepared
            .get_or_try_init(|| self.layout.prepare())
            .await
            .map(|_| ())
    }

    /// The full fetch set: every ranked category × policy, plus the two
    /// global documents.
    fn jobs(&self) -> Vec<FetchJob> {
        let endpoints = &self.config.endpoints;
        let mut jobs: Vec<FetchJob> = Intent::ranked()
            .flat_map(|intent| {
                IntentPolicy::ALL
                    .into_iter()
                    .map(move |policy| IntentPair::new(intent, policy))
            })
            .map(|pair| FetchJob {
                target: Target::Ranking(pair),
                url: endpoints.ranking_url(pair.intent, pair.intent_policy),
                path: self.layout.ranked(&pair),
            })
            .collect();
        jobs.push(FetchJob {
            target: Target::ModelsDev,
            url: endpoints.models_dev_url().to_string(),
            path: self.layout.models_dev(),
        });
        jobs.push(FetchJob {
            target: Target::AllModels,
            url: endpoints.all_models_url().to_string(),
            path: self.layout.all_models(),
        });
        jobs
    }

    /// Must be called with the refresh lock held.
    async fn refresh_locked(&self, state: &mut CacheState) -> Result<u64> {
        let result = self.refresh_snapshot().await;
        state.attempts += 1;
        self.attempts.store(state.attempts, Ordering::Release);
        match &result {
            Ok(_) => {
                state.last_error = None;
                metrics::counter!(telemetry::CACHE_REFRESHES_TOTAL, "status" => "ok")
                    .increment(1);
            }
            Err(e) => {
                state.last_error = Some(e.to_string());
                metrics::counter!(telemetry::CACHE_REFRESHES_TOTAL, "status" => "error")
                    .increment(1);
                warn!(error = %e, "snapshot refresh failed");
            }
        }
        result
    }

    /// Fetch everything, then commit files and the marker.
    async fn refresh_snapshot(&self) -> Result<u64> {
        let now = now_millis();
        let jobs = self.jobs();
        let count = jobs.len();
        info!(
            root = %self.layout.root().display(),
            fetches = count,
            source = self.source.name(),
            "refreshing model data snapshot"
        );
        let started = Instant::now();

        let bodies: Vec<(PathBuf, String)> = stream::iter(jobs)
            .map(|job| self.fetch(job))
            .buffer_unordered(self.config.max_concurrent_fetches)
            .try_collect()
            .await?;

        // The root may have been removed since startup.
        self.layout.prepare().await?;

        // Invalidate first so an interrupted commit is never served as fresh.
        let marker = self.layout.marker();
        write_atomic(&marker, "").await?;
        for (path, body) in &bodies {
            write_atomic(path, body).await?;
        }
        write_atomic(&marker, &now.to_string()).await?;

        info!(
            fetches = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model data snapshot refreshed"
        );
        Ok(now)
    }

    /// Fetch one document and check that it is JSON.
    async fn fetch(&self, job: FetchJob) -> Result<(PathBuf, String)> {
        let started = Instant::now();
        let timeout = self.config.fetch_timeout;
        let body = tokio::time::timeout(timeout, self.source.fetch(&job.url))
            .await
            .map_err(|_| VegvisirError::Timeout {
                url: job.url.clone(),
                after: timeout,
            })??;
        metrics::histogram!(telemetry::FETCH_DURATION_SECONDS, "source" => job.target.label())
            .record(started.elapsed().as_secs_f64());

        if let Err(e) = serde_json::from_str::<serde_json::Value>(&body) {
            return Err(VegvisirError::Cache(format!(
                "{} returned invalid JSON: {e}",
                job.url
            )));
        }
        Ok((job.path, body))
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| VegvisirError::io(path, e))
}
