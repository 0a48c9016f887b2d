//! Upstream data sources.
//!
//! [`DataSource`] is the seam between the cache manager and the network:
//! [`HttpDataSource`] talks to the real endpoints, tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{Intent, IntentPolicy};
use crate::{Result, VegvisirError};

/// Default base URL of the ranking source and the all-models snapshot.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/frontend/models";

/// Default URL of the model metadata catalog.
pub const DEFAULT_MODELS_DEV_URL: &str = "https://models.dev/api.json";

/// Fetches raw documents by URL.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Source name (used for logging).
    fn name(&self) -> &str;

    /// Fetch the body at `url`. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Upstream endpoint locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEndpoints {
    /// Base of the ranking and all-models endpoints.
    pub openrouter_base_url: String,
    /// Model metadata catalog.
    pub models_dev_url: String,
}

impl Default for DataEndpoints {
    fn default() -> Self {
        Self {
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            models_dev_url: DEFAULT_MODELS_DEV_URL.to_string(),
        }
    }
}

impl DataEndpoints {
    /// Ranked model list for one category/policy.
    pub fn ranking_url(&self, intent: Intent, policy: IntentPolicy) -> String {
        format!(
            "{}/find?categories={}&order={}",
            self.openrouter_base_url.trim_end_matches('/'),
            upstream_category(intent),
            policy
        )
    }

    /// The all-models snapshot.
    pub fn all_models_url(&self) -> &str {
        &self.openrouter_base_url
    }

    pub fn models_dev_url(&self) -> &str {
        &self.models_dev_url
    }
}

/// Category name as the ranking source expects it.
fn upstream_category(intent: Intent) -> &'static str {
    match intent {
        Intent::Seo => "marketing/seo",
        other => other.as_str(),
    }
}

/// [`DataSource`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: reqwest::Client,
}

impl HttpDataSource {
    /// Create a source whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vegvisir/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                VegvisirError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| VegvisirError::Http(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VegvisirError::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_url_shape() {
        let endpoints = DataEndpoints::default();
        assert_eq!(
            endpoints.ranking_url(Intent::Programming, IntentPolicy::MostPopular),
            "https://openrouter.ai/api/frontend/models/find?categories=programming&order=most-popular"
        );
    }

    #[test]
    fn seo_maps_to_marketing_subcategory() {
        let endpoints = DataEndpoints::default();
        let url = endpoints.ranking_url(Intent::Seo, IntentPolicy::LatencyLowToHigh);
        assert!(url.contains("categories=marketing/seo&order=latency-low-to-high"));
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let endpoints = DataEndpoints {
            openrouter_base_url: "http://localhost:1234/models/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            endpoints.ranking_url(Intent::Legal, IntentPolicy::PricingHighToLow),
            "http://localhost:1234/models/find?categories=legal&order=pricing-high-to-low"
        );
    }
}
