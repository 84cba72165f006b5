// src/types.rs
//! Data model shared by the aggregation, matching and roadmap paths.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel used instead of null so downstream aggregation stays total.
pub const NOT_SPECIFIED: &str = "Not specified";

/// One job posting as produced by a source extractor. Immutable once
/// extracted; fields that could not be located carry [`NOT_SPECIFIED`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub posted_date: String,
    pub source: String,
    pub experience_level: String,
    pub salary: String,
    pub extracted_skills: Vec<String>,
}

impl JobPosting {
    /// A posting with every field at its sentinel default, tagged with
    /// the source it came from.
    pub fn for_source(source: &str) -> Self {
        Self {
            title: NOT_SPECIFIED.to_string(),
            company: NOT_SPECIFIED.to_string(),
            location: NOT_SPECIFIED.to_string(),
            description: NOT_SPECIFIED.to_string(),
            url: NOT_SPECIFIED.to_string(),
            posted_date: NOT_SPECIFIED.to_string(),
            source: source.to_string(),
            experience_level: NOT_SPECIFIED.to_string(),
            salary: NOT_SPECIFIED.to_string(),
            extracted_skills: Vec::new(),
        }
    }

    /// A record is usable when at least one identifying field was
    /// actually extracted.
    pub fn has_usable_fields(&self) -> bool {
        self.title != NOT_SPECIFIED
            || self.company != NOT_SPECIFIED
            || self.description != NOT_SPECIFIED
    }
}

/// Query parameters for one aggregation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub role: String,
    pub location: String,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(role: &str, location: &str, limit: usize) -> Self {
        Self {
            role: role.to_string(),
            location: location.to_string(),
            limit,
        }
    }
}

/// How a source's contribution was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Genuinely scraped from the live site.
    Live,
    /// Synthetic fallback postings substituted after persistent failure.
    Sample,
    /// The source contributed nothing (failed or abandoned on timeout).
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationStats {
    pub total_jobs_found: usize,
    /// Sources that contributed at least one posting, live or sample.
    pub sources_used: usize,
    pub unique_companies: usize,
    pub date_range: String,
    /// Per-source trust flags so consumers can tell scraped data from
    /// fallback data.
    pub source_modes: BTreeMap<String, SourceMode>,
    /// Set when the overall timeout expired before every source finished.
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketInsights {
    /// Title-cased, ordered by descending market frequency.
    pub top_skills: Vec<String>,
    /// Lowercase canonical skill -> number of postings mentioning it
    /// (de-duplicated per posting, summed across postings).
    pub skill_frequency: BTreeMap<String, usize>,
    pub experience_distribution: BTreeMap<String, usize>,
    /// City (first comma-delimited segment) -> postings, top 10.
    pub location_distribution: BTreeMap<String, usize>,
}

impl MarketInsights {
    pub fn empty() -> Self {
        Self {
            top_skills: Vec::new(),
            skill_frequency: BTreeMap::new(),
            experience_distribution: BTreeMap::new(),
            location_distribution: BTreeMap::new(),
        }
    }
}

/// Full result of one aggregation call. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub search_query: SearchQuery,
    pub aggregation: AggregationStats,
    pub market_insights: MarketInsights,
    pub jobs: Vec<JobPosting>,
}

/// Severity of a market skill the learner does not adequately cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapLevel {
    High,
    Medium,
}

/// One skill gap. `match_score` is the best similarity found against
/// the learner's known skills, rounded to two decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapRecord {
    pub skill: String,
    #[serde(rename = "match")]
    pub match_score: f64,
    pub level: GapLevel,
}

/// One week of the study plan. `focus_skills` is the deterministic
/// allocation; `notes` is narrative content from the external
/// generative collaborator, absent when that service is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapWeek {
    pub week: u32,
    pub focus_skills: Vec<String>,
    pub hours: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapPlan {
    pub estimated_match_after: String,
    pub total_weeks: u32,
    pub roadmap: Vec<RoadmapWeek>,
}
