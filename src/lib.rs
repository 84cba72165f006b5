//! SkillBridge: job-market aggregation and skill-gap analysis.
//!
//! The engine fans out to job-board sources, merges postings into a
//! market snapshot, scores a learner's known skills against what the
//! market asks for and turns the uncovered skills into a weekly study
//! plan. Everything is reachable both through the HTTP API in [`web`]
//! and directly as library calls.

pub mod aggregator;
pub mod config;
pub mod fetcher;
pub mod matcher;
pub mod roadmap;
pub mod skills;
pub mod sources;
pub mod types;
pub mod util;
pub mod web;

pub use aggregator::Aggregator;
pub use config::{EngineConfig, MatchThresholds};
pub use matcher::compute_gaps;
pub use roadmap::generate_roadmap;
pub use types::{GapRecord, JobPosting, MarketAnalysis, RoadmapPlan, SearchQuery};
pub use web::start_web_server;
