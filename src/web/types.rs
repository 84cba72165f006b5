// src/web/types.rs
//! Request and response envelopes for the HTTP API.

use crate::types::{GapRecord, MarketAnalysis, RoadmapPlan};
use serde::{Deserialize, Serialize};

fn default_location() -> String {
    "India".to_string()
}

fn default_limit() -> usize {
    30
}

#[derive(Debug, Deserialize)]
pub struct JobMarketRequest {
    pub role: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub struct JobMarketResponse {
    pub success: bool,
    #[serde(flatten)]
    pub analysis: MarketAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeGapsRequest {
    pub job_skills: Vec<String>,
    pub known_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeGapsResponse {
    pub success: bool,
    pub gaps: Vec<GapRecord>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRoadmapRequest {
    pub gaps: Vec<GapRecord>,
    /// Week budget; engine default when absent.
    pub weeks: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRoadmapResponse {
    pub success: bool,
    #[serde(flatten)]
    pub plan: RoadmapPlan,
}

#[derive(Debug, Deserialize)]
pub struct ValidateSkillsRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateSkillsResponse {
    pub success: bool,
    pub validated: Vec<String>,
    pub uncertain: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: &str, error_code: &str, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            error_code: error_code.to_string(),
            suggestions,
        }
    }

    pub fn bad_request(error: &str, suggestions: Vec<String>) -> Self {
        Self::new(error, "BAD_REQUEST", suggestions)
    }
}
