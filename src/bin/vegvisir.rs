//! vegvisir: model resolution CLI
//!
//! Resolve identifiers, inspect the grammar, and manage the ranking snapshot.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vegvisir::parser;
use vegvisir::{Config, ParsedIdentifier, Resolver};

/// Vegvisir CLI
#[derive(Parser)]
#[command(name = "vegvisir")]
#[command(version)]
#[command(about = "Resolve intent and provider/model identifiers")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "VEGVISIR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the cache root directory.
    #[arg(long, env = "VEGVISIR_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an identifier to a concrete provider/model
    Resolve {
        /// Identifier, e.g. "programming/most-popular" or "openai/gpt-5-mini"
        model: String,
        /// Enable a provider (repeatable); merged with config and environment
        #[arg(short, long = "enable")]
        enable: Vec<String>,
    },

    /// Show how an identifier parses, without resolving it
    Parse {
        /// Identifier to parse
        model: String,
    },

    /// Refetch the ranking snapshot regardless of its age
    Refresh,

    /// Show snapshot location and age
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Parse { model } => match parser::parse(&model)? {
            ParsedIdentifier::Intent(pair) => {
                println!("kind: intent");
                println!("intent: {}", pair.intent);
                println!("policy: {}", pair.intent_policy);
            }
            ParsedIdentifier::ProviderModel(pair) => {
                println!("kind: provider/model");
                println!("provider: {}", pair.provider());
                println!("model: {}", pair.model());
            }
        },

        Command::Resolve { model, enable } => {
            let config = Config::load_or_default(args.config.as_deref())?;
            let resolver = build_resolver(&config, args.cache_dir)?;
            let mut enabled: HashSet<String> = config.enabled_providers();
            enabled.extend(enable);
            let resolved = resolver.resolve(&model, &enabled).await?;
            println!("provider: {}", resolved.provider);
            println!("model: {}", resolved.model);
        }

        Command::Refresh => {
            let config = Config::load_or_default(args.config.as_deref())?;
            let resolver = build_resolver(&config, args.cache_dir)?;
            let stamp = resolver.data().force_refresh().await?;
            println!("refreshed snapshot at {stamp}");
            println!("root: {}", resolver.data().layout().root().display());
        }

        Command::Status => {
            let config = Config::load_or_default(args.config.as_deref())?;
            let resolver = build_resolver(&config, args.cache_dir)?;
            let status = resolver.data().status().await?;
            println!("root: {}", status.root.display());
            match (status.last_fetch, status.age) {
                (Some(stamp), Some(age)) => {
                    println!("last fetch: {stamp} ({}s ago)", age.as_secs());
                }
                _ => println!("last fetch: never"),
            }
            println!("stale: {}", status.stale);
        }
    }

    Ok(())
}

/// Build a [`Resolver`] from configuration, honouring a cache dir override.
fn build_resolver(config: &Config, cache_dir: Option<PathBuf>) -> vegvisir::Result<Resolver> {
    let mut data_config = config.data_config();
    if let Some(dir) = cache_dir {
        data_config.root = dir;
    }
    Resolver::builder().data_config(data_config).build()
}
