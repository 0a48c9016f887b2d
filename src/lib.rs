//! Vegvisir - intent-aware model resolution for LLM gateways
//!
//! A caller names either a concrete model (`openai/gpt-5-mini`) or an intent
//! (`programming/most-popular`). Vegvisir turns either into one concrete
//! `(provider, model)` pair the caller holds credentials for.
//!
//! Intent resolution walks an externally ranked model list (kept in a local
//! on-disk snapshot, refreshed every 12 hours) through a curated candidate
//! table and picks the first candidate whose provider is enabled.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::HashSet;
//! use vegvisir::Resolver;
//!
//! #[tokio::main]
//! async fn main() -> vegvisir::Result<()> {
//!     let resolver = Resolver::builder()
//!         .cache_root("/var/cache/vegvisir")
//!         .build()?;
//!
//!     let enabled: HashSet<String> = ["anthropic".to_string()].into();
//!     let resolved = resolver.resolve("programming/most-popular", &enabled).await?;
//!
//!     println!("{} via {}", resolved.model, resolved.provider);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod parser;
pub mod resolver;
pub mod tables;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use error::{ParseErrorKind, Result, VegvisirError};
pub use resolver::{Resolver, ResolverBuilder};

pub use config::Config;
pub use data::{CacheStatus, DataConfig, DataEndpoints, DataManager, DataSource, HttpDataSource};
pub use tables::{Candidate, CandidateTable};
pub use types::{
    Intent, IntentPair, IntentPolicy, ParsedIdentifier, ProviderModelPair, ResolvedResponse,
};
