//! Intent vocabulary.
//!
//! [`Intent`] and [`IntentPolicy`] are closed sets fixed at compile time.
//! Both parse case-insensitively from their kebab-case names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, VegvisirError};

/// A use-case category a caller can request instead of a concrete model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Synthetic category with no ranked data of its own.
    Auto,
    Academia,
    Finance,
    Health,
    Legal,
    Marketing,
    Programming,
    Roleplay,
    Science,
    Seo,
    Technology,
    Translation,
    Trivia,
}

impl Intent {
    /// Every known intent, `Auto` included.
    pub const ALL: [Intent; 13] = [
        Intent::Auto,
        Intent::Academia,
        Intent::Finance,
        Intent::Health,
        Intent::Legal,
        Intent::Marketing,
        Intent::Programming,
        Intent::Roleplay,
        Intent::Science,
        Intent::Seo,
        Intent::Technology,
        Intent::Translation,
        Intent::Trivia,
    ];

    /// Canonical lowercase name, also used as the cache subdirectory.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Auto => "auto",
            Intent::Academia => "academia",
            Intent::Finance => "finance",
            Intent::Health => "health",
            Intent::Legal => "legal",
            Intent::Marketing => "marketing",
            Intent::Programming => "programming",
            Intent::Roleplay => "roleplay",
            Intent::Science => "science",
            Intent::Seo => "seo",
            Intent::Technology => "technology",
            Intent::Translation => "translation",
            Intent::Trivia => "trivia",
        }
    }

    /// Whether the ranking source publishes data for this category.
    pub fn is_ranked(&self) -> bool {
        !matches!(self, Intent::Auto)
    }

    /// Categories that get a cache subdirectory and ranking fetches.
    pub fn ranked() -> impl Iterator<Item = Intent> {
        Self::ALL.into_iter().filter(Intent::is_ranked)
    }

    /// Case-insensitive lookup; `None` if the name is not a known intent.
    pub fn lookup(name: &str) -> Option<Intent> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = VegvisirError;

    fn from_str(s: &str) -> Result<Self> {
        Intent::lookup(s).ok_or_else(|| {
            VegvisirError::InvalidIntent(format!("not a valid intent literal: \"{s}\""))
        })
    }
}

/// Ordering criterion applied by the ranking source within an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentPolicy {
    MostPopular,
    PricingLowToHigh,
    PricingHighToLow,
    ContextHighToLow,
    LatencyLowToHigh,
    ThroughputHighToLow,
}

impl IntentPolicy {
    pub const ALL: [IntentPolicy; 6] = [
        IntentPolicy::MostPopular,
        IntentPolicy::PricingLowToHigh,
        IntentPolicy::PricingHighToLow,
        IntentPolicy::ContextHighToLow,
        IntentPolicy::LatencyLowToHigh,
        IntentPolicy::ThroughputHighToLow,
    ];

    /// Canonical kebab-case name, also the upstream `order` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentPolicy::MostPopular => "most-popular",
            IntentPolicy::PricingLowToHigh => "pricing-low-to-high",
            IntentPolicy::PricingHighToLow => "pricing-high-to-low",
            IntentPolicy::ContextHighToLow => "context-high-to-low",
            IntentPolicy::LatencyLowToHigh => "latency-low-to-high",
            IntentPolicy::ThroughputHighToLow => "throughput-high-to-low",
        }
    }

    /// Case-insensitive lookup; `None` if the name is not a known policy.
    pub fn lookup(name: &str) -> Option<IntentPolicy> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for IntentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
