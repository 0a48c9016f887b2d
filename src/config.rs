//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.vegvisir/config.toml` (user)
//! 3. `/etc/vegvisir/config.toml` (system)
//!
//! Every section is optional. The enabled-provider set is the configured list
//! plus any provider whose credential environment variable is set.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::data::source::{DEFAULT_MODELS_DEV_URL, DEFAULT_OPENROUTER_BASE_URL};
use crate::data::{DataConfig, DataEndpoints, default_cache_root};
use crate::{Result, VegvisirError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// Snapshot location and lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Cache root (default: `~/.cache/vegvisir`).
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Snapshot TTL in seconds (default: 43200, 12 hours).
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: None,
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    12 * 60 * 60
}

/// Upstream fetch behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-fetch timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Maximum fetches in flight during a refresh (default: 32).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,
    #[serde(default = "default_models_dev_url")]
    pub models_dev_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_concurrent: default_max_concurrent(),
            openrouter_base_url: default_openrouter_base_url(),
            models_dev_url: default_models_dev_url(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrent() -> usize {
    32
}

fn default_openrouter_base_url() -> String {
    DEFAULT_OPENROUTER_BASE_URL.to_string()
}

fn default_models_dev_url() -> String {
    DEFAULT_MODELS_DEV_URL.to_string()
}

/// Providers the caller is allowed to use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub enabled: Vec<String>,
}

/// Provider name → credential environment variable.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("google", "GOOGLE_GENERATIVE_AI_API_KEY"),
    ("google-vertex", "GOOGLE_VERTEX_PROJECT"),
    ("google-vertex-anthropic", "GOOGLE_VERTEX_PROJECT"),
    ("amazon-bedrock", "AWS_ACCESS_KEY_ID"),
    ("azure", "AZURE_API_KEY"),
    ("azure-cognitive-services", "AZURE_COGNITIVE_SERVICES_API_KEY"),
    ("opencode", "OPENCODE_API_KEY"),
];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Fails if an explicit path is missing or no config file exists.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_config_path(explicit_path)?;
        Self::load_from_file(&path)
    }

    /// Like [`load()`](Self::load), but falls back to defaults when no file
    /// exists at the standard locations. An explicit path must still exist.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Result<Self> {
        if explicit_path.is_some() {
            return Self::load(explicit_path);
        }
        match Self::find_standard_path() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VegvisirError::Configuration(format!("failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            VegvisirError::Configuration(format!("failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(VegvisirError::Configuration(format!(
                "config file not found: {path:?}"
            )));
        }

        Self::find_standard_path().ok_or_else(|| {
            VegvisirError::Configuration(
                "no config file found. Create ~/.vegvisir/config.toml or /etc/vegvisir/config.toml"
                    .to_string(),
            )
        })
    }

    fn find_standard_path() -> Option<PathBuf> {
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".vegvisir").join("config.toml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        let system_config = PathBuf::from("/etc/vegvisir/config.toml");
        system_config.exists().then_some(system_config)
    }

    /// Data manager settings derived from this config.
    pub fn data_config(&self) -> DataConfig {
        let root = self.cache.root.clone().unwrap_or_else(default_cache_root);
        DataConfig::new(root)
            .ttl(Duration::from_secs(self.cache.ttl_secs))
            .fetch_timeout(Duration::from_secs(self.fetch.timeout_secs))
            .max_concurrent_fetches(self.fetch.max_concurrent)
            .endpoints(DataEndpoints {
                openrouter_base_url: self.fetch.openrouter_base_url.clone(),
                models_dev_url: self.fetch.models_dev_url.clone(),
            })
    }

    /// Configured providers plus those with credentials in the environment.
    pub fn enabled_providers(&self) -> HashSet<String> {
        self.enabled_providers_with(|var| std::env::var(var).ok())
    }

    /// [`enabled_providers()`](Self::enabled_providers) with an injectable
    /// environment lookup.
    pub fn enabled_providers_with<F>(&self, env: F) -> HashSet<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut enabled: HashSet<String> = self.providers.enabled.iter().cloned().collect();
        for (provider, var) in PROVIDER_ENV_VARS {
            if env(var).is_some_and(|v| !v.is_empty()) {
                enabled.insert((*provider).to_string());
            }
        }
        enabled
    }
}
