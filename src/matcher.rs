// src/matcher.rs
//! Similarity-based gap scoring between market skills and a learner's
//! known skills. Pure functions; no state survives a call.

use crate::config::MatchThresholds;
use crate::types::{GapLevel, GapRecord};
use strsim::normalized_levenshtein;

/// Normalized sequence similarity in [0,1]; 1.0 means identical after
/// trimming and lowercasing.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.trim().to_lowercase(), &b.trim().to_lowercase())
}

/// Score each market skill against the known-skill set and keep the
/// ones below the coverage threshold, worst matches first. Empty input
/// on either side yields an empty list, not an error.
pub fn compute_gaps(
    job_skills: &[String],
    known_skills: &[String],
    thresholds: &MatchThresholds,
) -> Vec<GapRecord> {
    compute_gaps_with(job_skills, known_skills, thresholds, similarity)
}

/// Same as [`compute_gaps`] but generic over the similarity function,
/// so callers can plug in an embedding-based scorer.
pub fn compute_gaps_with<F>(
    job_skills: &[String],
    known_skills: &[String],
    thresholds: &MatchThresholds,
    similarity: F,
) -> Vec<GapRecord>
where
    F: Fn(&str, &str) -> f64,
{
    if job_skills.is_empty() || known_skills.is_empty() {
        return Vec::new();
    }

    let mut gaps = Vec::new();
    for skill in job_skills {
        let best = known_skills
            .iter()
            .map(|known| similarity(skill, known))
            .fold(0.0_f64, f64::max);

        if best < thresholds.cover {
            let level = if best < thresholds.high {
                GapLevel::High
            } else {
                GapLevel::Medium
            };
            gaps.push(GapRecord {
                skill: skill.clone(),
                match_score: (best * 100.0).round() / 100.0,
                level,
            });
        }
    }

    // worst matches first, so roadmap building tackles the hardest
    // gaps in the earliest weeks; stable for equal scores
    gaps.sort_by(|a, b| a.match_score.total_cmp(&b.match_score));
    gaps
}
