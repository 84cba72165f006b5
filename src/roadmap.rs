// src/roadmap.rs
//! Study-plan construction. The weekly skeleton is computed locally
//! and deterministically; an optional external generative service only
//! ever adds narrative notes on top. When that service is missing or
//! fails, the caller still gets a structurally valid plan.

use crate::config::EngineConfig;
use crate::types::{GapRecord, RoadmapPlan, RoadmapWeek};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

const ROADMAP_ENDPOINT: &str = "/roadmap";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Skills scheduled per week, worst matches first.
const SKILLS_PER_WEEK: usize = 2;

/// Allocate gap skills over the configured number of weeks. Produces
/// at most `weeks` entries; trailing weeks with nothing to study are
/// omitted rather than emitted empty.
pub fn build_skeleton(gaps: &[GapRecord], weeks: u32, hours_per_week: u32) -> Vec<RoadmapWeek> {
    gaps.chunks(SKILLS_PER_WEEK)
        .take(weeks as usize)
        .enumerate()
        .map(|(index, chunk)| RoadmapWeek {
            week: index as u32 + 1,
            focus_skills: chunk.iter().map(|gap| gap.skill.clone()).collect(),
            hours: hours_per_week,
            notes: None,
        })
        .collect()
}

/// Projected overall match once the scheduled gaps are closed.
/// Scheduled gaps count as fully covered; gaps that did not fit in the
/// plan keep their current score.
pub fn estimate_match_after(gaps: &[GapRecord], weeks: u32) -> String {
    if gaps.is_empty() {
        return "100%".to_string();
    }

    let capacity = weeks as usize * SKILLS_PER_WEEK;
    let scheduled = gaps.len().min(capacity);
    let leftover: f64 = gaps[scheduled..].iter().map(|gap| gap.match_score).sum();
    let projected = (scheduled as f64 + leftover) / gaps.len() as f64;

    format!("{:.0}%", (projected * 100.0).round())
}

#[derive(Debug, Deserialize)]
struct NarrativeWeek {
    week: u32,
    notes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NarrativeResponse {
    status: String,
    weeks: Vec<NarrativeWeek>,
}

/// Client for the external roadmap narrative service.
pub struct RoadmapClient {
    client: reqwest::Client,
    base_url: String,
}

impl RoadmapClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Request narrative notes for a skeleton. Any failure surfaces as
    /// an error; the caller decides how to degrade.
    pub async fn fetch_notes(
        &self,
        gaps: &[GapRecord],
        skeleton: &[RoadmapWeek],
    ) -> Result<Vec<(u32, Vec<String>)>> {
        let url = format!("{}{}", self.base_url, ROADMAP_ENDPOINT);

        let payload = serde_json::json!({
            "gaps": gaps,
            "weeks": skeleton,
        });

        info!("Calling roadmap narrative service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Failed to call roadmap narrative service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Narrative service returned {}: {}", status, error_text);
        }

        let narrative: NarrativeResponse = response
            .json()
            .await
            .context("Failed to parse narrative response")?;

        if narrative.status != "success" {
            anyhow::bail!("Narrative generation failed: {}", narrative.status);
        }

        Ok(narrative
            .weeks
            .into_iter()
            .map(|week| (week.week, week.notes))
            .collect())
    }
}

/// Attach narrative notes to matching skeleton weeks. Notes for
/// unknown week numbers are dropped.
pub(crate) fn apply_notes(skeleton: &mut [RoadmapWeek], notes: Vec<(u32, Vec<String>)>) {
    for (week_number, week_notes) in notes {
        if let Some(week) = skeleton.iter_mut().find(|w| w.week == week_number) {
            week.notes = Some(week_notes);
        }
    }
}

/// Build the full plan for a gap list. The skeleton and estimate are
/// always computed; narrative enrichment happens only when a service
/// URL is configured, and its failure empties the weekly breakdown
/// while keeping the summary fields intact.
pub async fn generate_roadmap(config: &EngineConfig, gaps: &[GapRecord]) -> RoadmapPlan {
    let mut skeleton = build_skeleton(gaps, config.default_weeks, config.hours_per_week);
    let estimated_match_after = estimate_match_after(gaps, config.default_weeks);

    if let Some(base_url) = &config.roadmap_service_url {
        let enriched = match RoadmapClient::new(base_url.clone()) {
            Ok(client) => client.fetch_notes(gaps, &skeleton).await,
            Err(e) => Err(e),
        };
        match enriched {
            Ok(notes) => apply_notes(&mut skeleton, notes),
            Err(e) => {
                warn!("Roadmap narrative unavailable: {:#}", e);
                skeleton.clear();
            }
        }
    }

    RoadmapPlan {
        estimated_match_after,
        total_weeks: config.default_weeks,
        roadmap: skeleton,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GapLevel;

    fn gap(skill: &str, score: f64) -> GapRecord {
        GapRecord {
            skill: skill.to_string(),
            match_score: score,
            level: if score < 0.40 {
                GapLevel::High
            } else {
                GapLevel::Medium
            },
        }
    }

    #[test]
    fn test_skeleton_packs_two_skills_per_week() {
        let gaps = vec![
            gap("Kubernetes", 0.10),
            gap("Docker", 0.20),
            gap("Terraform", 0.25),
            gap("Ansible", 0.30),
            gap("Redis", 0.45),
        ];
        let skeleton = build_skeleton(&gaps, 8, 12);

        assert_eq!(skeleton.len(), 3);
        assert_eq!(skeleton[0].week, 1);
        assert_eq!(skeleton[0].focus_skills, vec!["Kubernetes", "Docker"]);
        assert_eq!(skeleton[2].focus_skills, vec!["Redis"]);
        assert!(skeleton.iter().all(|w| w.hours == 12));
        assert!(skeleton.iter().all(|w| w.notes.is_none()));
    }

    #[test]
    fn test_skeleton_bounded_by_week_budget() {
        let gaps: Vec<GapRecord> = (0..10).map(|i| gap(&format!("Skill{}", i), 0.1)).collect();
        let skeleton = build_skeleton(&gaps, 3, 10);

        assert_eq!(skeleton.len(), 3);
        let scheduled: usize = skeleton.iter().map(|w| w.focus_skills.len()).sum();
        assert_eq!(scheduled, 6);
    }

    #[test]
    fn test_no_gaps_means_full_match() {
        assert!(build_skeleton(&[], 8, 12).is_empty());
        assert_eq!(estimate_match_after(&[], 8), "100%");
    }

    #[test]
    fn test_estimate_counts_scheduled_gaps_as_covered() {
        let gaps = vec![gap("Kubernetes", 0.10), gap("Docker", 0.20)];
        // both fit in week one, so the projection is full coverage
        assert_eq!(estimate_match_after(&gaps, 8), "100%");
    }

    #[test]
    fn test_estimate_keeps_unscheduled_scores() {
        let gaps: Vec<GapRecord> = (0..4).map(|i| gap(&format!("Skill{}", i), 0.5)).collect();
        // one week schedules two gaps; the other two stay at 0.5
        assert_eq!(estimate_match_after(&gaps, 1), "75%");
    }

    #[test]
    fn test_apply_notes_matches_week_numbers() {
        let gaps = vec![gap("Kubernetes", 0.10), gap("Docker", 0.20)];
        let mut skeleton = build_skeleton(&gaps, 8, 12);

        apply_notes(
            &mut skeleton,
            vec![
                (1, vec!["Start with container basics".to_string()]),
                (99, vec!["Dropped".to_string()]),
            ],
        );

        assert_eq!(
            skeleton[0].notes.as_deref(),
            Some(&["Start with container basics".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_generate_without_service_keeps_skeleton() {
        let config = EngineConfig::default();
        let gaps = vec![gap("Kubernetes", 0.10), gap("Docker", 0.20)];

        let plan = generate_roadmap(&config, &gaps).await;

        assert_eq!(plan.total_weeks, 8);
        assert_eq!(plan.roadmap.len(), 1);
        assert!(plan.roadmap[0].notes.is_none());
    }

    #[tokio::test]
    async fn test_generate_with_unreachable_service_degrades() {
        let mut config = EngineConfig::default();
        config.roadmap_service_url = Some("http://127.0.0.1:1".to_string());
        let gaps = vec![gap("Kubernetes", 0.10)];

        let plan = generate_roadmap(&config, &gaps).await;

        // summary fields survive; weekly breakdown is emptied
        assert_eq!(plan.total_weeks, 8);
        assert_eq!(plan.estimated_match_after, "100%");
        assert!(plan.roadmap.is_empty());
    }
}
