// src/config.rs
//! Engine configuration. Defaults cover everything; an optional TOML
//! file (path in SKILLBRIDGE_CONFIG) and a couple of environment
//! variables override individual values.

use crate::fetcher::FetchPolicy;
use crate::sources::SourceKind;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

/// Similarity cutoffs for gap classification. One canonical default
/// set; the source material disagreed between variants, so these are
/// explicit and configurable rather than scattered literals.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MatchThresholds {
    /// Best match at or above this is covered and excluded from gaps.
    pub cover: f64,
    /// Best match below this is a High gap; between `high` and `cover`
    /// is Medium.
    pub high: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            cover: 0.55,
            high: 0.40,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sources fanned out to by the aggregator, in order.
    pub sources: Vec<SourceKind>,
    pub fetch: FetchPolicy,
    pub thresholds: MatchThresholds,
    /// Top-N skills reported in market insights.
    pub top_skills: usize,
    /// Market skills fed to the gap matcher.
    pub gap_candidates: usize,
    pub default_weeks: u32,
    pub hours_per_week: u32,
    /// Overall wall-clock budget for one aggregation call; on expiry
    /// the partial result is returned tagged degraded.
    pub aggregation_timeout_secs: u64,
    /// Generative collaborator filling roadmap narrative. None means
    /// skeleton-only roadmaps.
    pub roadmap_service_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sources: vec![SourceKind::Indeed, SourceKind::TimesJobs],
            fetch: FetchPolicy::default(),
            thresholds: MatchThresholds::default(),
            top_skills: 25,
            gap_candidates: 15,
            default_weeks: 8,
            hours_per_week: 12,
            aggregation_timeout_secs: 120,
            roadmap_service_url: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration: defaults, then the optional TOML file, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("SKILLBRIDGE_CONFIG") {
            Ok(path) => {
                info!("Loading engine configuration from {}", path);
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {}", path))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(url) = std::env::var("ROADMAP_SERVICE_URL") {
            config.roadmap_service_url = Some(url);
        }

        Ok(config)
    }

    pub fn aggregation_timeout(&self) -> Duration {
        Duration::from_secs(self.aggregation_timeout_secs)
    }
}
