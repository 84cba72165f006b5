// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::config::EngineConfig;
use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/job-market", data = "<request>")]
pub async fn job_market(
    request: Json<JobMarketRequest>,
    config: &State<EngineConfig>,
) -> Result<Json<JobMarketResponse>, Json<ErrorResponse>> {
    handlers::job_market_handler(request, config).await
}

#[post("/analyze-gaps", data = "<request>")]
pub async fn analyze_gaps(
    request: Json<AnalyzeGapsRequest>,
    config: &State<EngineConfig>,
) -> Json<AnalyzeGapsResponse> {
    handlers::analyze_gaps_handler(request, config).await
}

#[post("/generate-roadmap", data = "<request>")]
pub async fn generate_roadmap(
    request: Json<GenerateRoadmapRequest>,
    config: &State<EngineConfig>,
) -> Json<GenerateRoadmapResponse> {
    handlers::generate_roadmap_handler(request, config).await
}

#[post("/validate-skills", data = "<request>")]
pub async fn validate_skills(
    request: Json<ValidateSkillsRequest>,
) -> Json<ValidateSkillsResponse> {
    handlers::validate_skills_handler(request).await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::bad_request(
        "Invalid request format",
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::bad_request(
        "Request body could not be parsed",
        vec!["Verify field names and types against the API docs".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        "Internal server error",
        "INTERNAL_ERROR",
        vec!["Try again in a few moments".to_string()],
    ))
}

pub fn build_rocket(config: EngineConfig, port: u16) -> rocket::Rocket<rocket::Build> {
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(config)
        .register("/api", catchers![bad_request, unprocessable, internal_error])
        .mount(
            "/api",
            routes![
                job_market,
                analyze_gaps,
                generate_roadmap,
                validate_skills,
                health,
                options,
            ],
        )
}

pub async fn start_web_server(config: EngineConfig, port: u16) -> Result<()> {
    info!("Starting SkillBridge API server on port {}", port);
    info!(
        "Sources configured: {}",
        config
            .sources
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    );

    build_rocket(config, port)
        .launch()
        .await
        .context("Web server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;

    async fn client() -> Client {
        let rocket = build_rocket(EngineConfig::default(), 8200);
        Client::tracked(rocket).await.expect("valid rocket")
    }

    #[rocket::async_test]
    async fn test_health_endpoint() {
        let client = client().await;
        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body: serde_json::Value =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "skillbridge");
    }

    #[rocket::async_test]
    async fn test_validate_skills_endpoint() {
        let client = client().await;
        let response = client
            .post("/api/validate-skills")
            .header(ContentType::JSON)
            .body(r#"{"skills": ["python", "underwater basket weaving"]}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: serde_json::Value =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["validated"][0], "python");
        assert_eq!(body["uncertain"][0], "underwater basket weaving");
    }

    #[rocket::async_test]
    async fn test_analyze_gaps_endpoint() {
        let client = client().await;
        let response = client
            .post("/api/analyze-gaps")
            .header(ContentType::JSON)
            .body(r#"{"job_skills": ["Python", "Kubernetes"], "known_skills": ["Python"]}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: serde_json::Value =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["gaps"][0]["skill"], "Kubernetes");
        assert_eq!(body["gaps"][0]["level"], "High");
    }

    #[rocket::async_test]
    async fn test_analyze_gaps_empty_known_skills_yields_no_gaps() {
        let client = client().await;
        let response = client
            .post("/api/analyze-gaps")
            .header(ContentType::JSON)
            .body(r#"{"job_skills": ["Python"], "known_skills": []}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: serde_json::Value =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body["success"], true);
        assert!(body["gaps"].as_array().unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn test_malformed_body_hits_catcher() {
        let client = client().await;
        let response = client
            .post("/api/validate-skills")
            .header(ContentType::JSON)
            .body("{not json")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
    }

    #[rocket::async_test]
    async fn test_generate_roadmap_endpoint() {
        let client = client().await;
        let response = client
            .post("/api/generate-roadmap")
            .header(ContentType::JSON)
            .body(
                r#"{"gaps": [
                    {"skill": "Kubernetes", "match": 0.1, "level": "High"},
                    {"skill": "Docker", "match": 0.2, "level": "High"}
                ]}"#,
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: serde_json::Value =
            serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["total_weeks"], 8);
        assert_eq!(body["roadmap"][0]["focus_skills"][0], "Kubernetes");
    }
}
