//! Builder for configuring resolver instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::Resolver;
use crate::Result;
use crate::data::{DataConfig, DataEndpoints, DataManager, DataSource};
use crate::tables::CandidateTable;

/// Builder for [`Resolver`].
///
/// Defaults: cache under `~/.cache/vegvisir`, 12h TTL, HTTP data source,
/// compiled-in candidate table.
pub struct ResolverBuilder {
    data_config: DataConfig,
    source: Option<Arc<dyn DataSource>>,
    data: Option<Arc<DataManager>>,
    table: Option<CandidateTable>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            data_config: DataConfig::default(),
            source: None,
            data: None,
            table: None,
        }
    }

    /// Replace the whole data configuration.
    pub fn data_config(mut self, config: DataConfig) -> Self {
        self.data_config = config;
        self
    }

    /// Set the cache root directory.
    pub fn cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.data_config.root = root.into();
        self
    }

    /// Set the snapshot TTL.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.data_config = self.data_config.ttl(ttl);
        self
    }

    /// Set the per-fetch timeout.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.data_config = self.data_config.fetch_timeout(timeout);
        self
    }

    /// Set the refresh fan-out limit.
    pub fn max_concurrent_fetches(mut self, n: usize) -> Self {
        self.data_config = self.data_config.max_concurrent_fetches(n);
        self
    }

    /// Point the data manager at different upstream endpoints.
    pub fn endpoints(mut self, endpoints: DataEndpoints) -> Self {
        self.data_config = self.data_config.endpoints(endpoints);
        self
    }

    /// Use a custom data source instead of HTTP.
    pub fn data_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Share an existing data manager. Overrides all data settings.
    pub fn data_manager(mut self, data: Arc<DataManager>) -> Self {
        self.data = Some(data);
        self
    }

    /// Use a custom candidate table instead of the compiled-in one.
    pub fn candidates(mut self, table: CandidateTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Build the resolver.
    ///
    /// Nothing is fetched or created on disk until the first intent
    /// resolution.
    pub fn build(self) -> Result<Resolver> {
        let data = match (self.data, self.source) {
            (Some(data), _) => data,
            (None, Some(source)) => Arc::new(DataManager::with_source(self.data_config, source)),
            (None, None) => Arc::new(DataManager::new(self.data_config)?),
        };
        let table = Arc::new(
            self.table
                .unwrap_or_else(|| CandidateTable::builtin().clone()),
        );
        Ok(Resolver::new(data, table))
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_data_settings() {
        let resolver = ResolverBuilder::new()
            .cache_root("/tmp/vegvisir-test")
            .ttl(Duration::from_secs(60))
            .fetch_timeout(Duration::from_secs(3))
            .max_concurrent_fetches(4)
            .build()
            .unwrap();
        let config = resolver.data().config();
        assert_eq!(config.root, PathBuf::from("/tmp/vegvisir-test"));
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.max_concurrent_fetches, 4);
    }

    #[test]
    fn builder_defaults_to_builtin_table() {
        let resolver = ResolverBuilder::new().build().unwrap();
        assert_eq!(
            resolver.candidates().len(),
            CandidateTable::builtin().len()
        );
    }
}
