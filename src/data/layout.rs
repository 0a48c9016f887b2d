//! On-disk cache layout and staleness marker.
//!
//! ```text
//! <root>/
//!   .last-fetch            unix-epoch millis as text
//!   models_dev.json        model metadata snapshot
//!   openrouter.json        all-models snapshot
//!   <category>/<policy>.json
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::types::{Intent, IntentPair};
use crate::{Result, VegvisirError};

const MARKER_FILE: &str = ".last-fetch";
const MODELS_DEV_FILE: &str = "models_dev.json";
const ALL_MODELS_FILE: &str = "openrouter.json";

/// Paths inside a cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Staleness marker.
    pub fn marker(&self) -> PathBuf {
        self.root.join(MARKER_FILE)
    }

    pub fn models_dev(&self) -> PathBuf {
        self.root.join(MODELS_DEV_FILE)
    }

    pub fn all_models(&self) -> PathBuf {
        self.root.join(ALL_MODELS_FILE)
    }

    pub fn category_dir(&self, intent: Intent) -> PathBuf {
        self.root.join(intent.as_str())
    }

    /// Ranked model list for one partition.
    pub fn ranked(&self, pair: &IntentPair) -> PathBuf {
        self.category_dir(pair.intent)
            .join(format!("{}.json", pair.intent_policy))
    }

    /// Create the root, one directory per ranked category, and an empty
    /// marker if none exists. Safe to call on an existing cache.
    pub async fn prepare(&self) -> Result<()> {
        debug!(root = %self.root.display(), "preparing cache layout");
        for intent in Intent::ranked() {
            let dir = self.category_dir(intent);
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| VegvisirError::io(&dir, e))?;
        }
        let marker = self.marker();
        if !tokio::fs::try_exists(&marker)
            .await
            .map_err(|e| VegvisirError::io(&marker, e))?
        {
            tokio::fs::write(&marker, "")
                .await
                .map_err(|e| VegvisirError::io(&marker, e))?;
        }
        Ok(())
    }
}

/// Mutable cache state guarded by the refresh lock.
#[derive(Debug, Default)]
pub(crate) struct CacheState {
    /// Completed refresh attempts, successful or not.
    pub attempts: u64,
    /// Error of the latest attempt, cleared by a successful one.
    pub last_error: Option<String>,
}

/// Current time as unix-epoch millis.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// `now - last_fetch >= ttl`.
pub fn is_stale(now: u64, last_fetch: u64, ttl: Duration) -> bool {
    u128::from(now.saturating_sub(last_fetch)) >= ttl.as_millis()
}

/// Read the staleness marker.
///
/// A missing or empty marker reads as 0 (always stale). A corrupt marker is
/// logged and also reads as 0.
pub async fn read_marker(path: &Path) -> Result<u64> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(VegvisirError::io(path, e)),
    };
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match trimmed.parse::<u64>() {
        Ok(millis) => Ok(millis),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "corrupt staleness marker, treating cache as stale"
            );
            Ok(0)
        }
    }
}

/// Write a file atomically (tmp + rename).
pub async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| VegvisirError::io(&tmp_path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| VegvisirError::io(path, e))?;
    Ok(())
}
