// src/web/handlers.rs
use crate::aggregator::Aggregator;
use crate::config::EngineConfig;
use crate::matcher::compute_gaps;
use crate::roadmap::generate_roadmap;
use crate::skills::validate_skills;
use crate::types::SearchQuery;
use crate::web::types::*;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

fn require_role(role: &str) -> Result<(), Json<ErrorResponse>> {
    if role.trim().is_empty() {
        return Err(Json(ErrorResponse::bad_request(
            "Field 'role' must not be empty",
            vec!["Provide a target role, e.g. \"Python Developer\"".to_string()],
        )));
    }
    Ok(())
}

pub async fn job_market_handler(
    request: Json<JobMarketRequest>,
    config: &State<EngineConfig>,
) -> Result<Json<JobMarketResponse>, Json<ErrorResponse>> {
    require_role(&request.role)?;

    let query = SearchQuery::new(&request.role, &request.location, request.limit);
    let analysis = Aggregator::new(config.inner().clone()).aggregate(query).await;

    Ok(Json(JobMarketResponse {
        success: true,
        analysis,
    }))
}

pub async fn analyze_gaps_handler(
    request: Json<AnalyzeGapsRequest>,
    config: &State<EngineConfig>,
) -> Json<AnalyzeGapsResponse> {
    // empty input on either side means no gaps, not an error
    let gaps = compute_gaps(
        &request.job_skills,
        &request.known_skills,
        &config.thresholds,
    );
    info!(
        "Gap analysis: {} of {} market skills uncovered",
        gaps.len(),
        request.job_skills.len()
    );

    Json(AnalyzeGapsResponse {
        success: true,
        gaps,
    })
}

pub async fn generate_roadmap_handler(
    request: Json<GenerateRoadmapRequest>,
    config: &State<EngineConfig>,
) -> Json<GenerateRoadmapResponse> {
    let mut effective = config.inner().clone();
    if let Some(weeks) = request.weeks {
        effective.default_weeks = weeks;
    }

    let plan = generate_roadmap(&effective, &request.gaps).await;

    Json(GenerateRoadmapResponse {
        success: true,
        plan,
    })
}

pub async fn validate_skills_handler(
    request: Json<ValidateSkillsRequest>,
) -> Json<ValidateSkillsResponse> {
    let outcome = validate_skills(&request.skills);
    Json(ValidateSkillsResponse {
        success: true,
        validated: outcome.validated,
        uncertain: outcome.uncertain,
    })
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "skillbridge",
    })
}
