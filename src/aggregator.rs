// src/aggregator.rs
//! Fan-out across configured sources, merge, and derived market
//! statistics. Failures below this boundary are recovered locally:
//! a dead source is replaced by a flagged sample batch and the caller
//! always receives a well-formed result.

use crate::config::EngineConfig;
use crate::skills::{canonical_key, extract_skills};
use crate::sources::sample::{SampleSource, FALLBACK_BATCH};
use crate::sources::SourceExtractor;
use crate::types::{
    AggregationStats, JobPosting, MarketAnalysis, MarketInsights, SearchQuery, SourceMode,
    NOT_SPECIFIED,
};
use crate::util::title_case;
use std::collections::BTreeMap;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info, warn};

const DATE_RANGE: &str = "Last 30 days";
const TOP_LOCATIONS: usize = 10;

pub struct Aggregator {
    config: EngineConfig,
}

impl Aggregator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run one aggregation call over the configured sources.
    pub async fn aggregate(&self, query: SearchQuery) -> MarketAnalysis {
        let mut sources: Vec<Box<dyn SourceExtractor>> = Vec::new();
        for (index, kind) in self.config.sources.iter().enumerate() {
            let policy = self
                .config
                .fetch
                .clone()
                .with_seed(self.config.fetch.seed.wrapping_add(index as u64 + 1));
            match kind.build(policy) {
                Ok(source) => sources.push(source),
                Err(e) => error!("Failed to build source {}: {}", kind.label(), e),
            }
        }
        self.aggregate_with(query, sources).await
    }

    /// Aggregation over explicit extractors; the production path and
    /// tests share this.
    pub async fn aggregate_with(
        &self,
        query: SearchQuery,
        sources: Vec<Box<dyn SourceExtractor>>,
    ) -> MarketAnalysis {
        info!(
            "Starting job aggregation for '{}' in {} (limit {})",
            query.role, query.location, query.limit
        );

        let mut source_modes: BTreeMap<String, SourceMode> = BTreeMap::new();
        let mut contributed: BTreeMap<String, usize> = BTreeMap::new();

        if query.limit == 0 || sources.is_empty() {
            for source in &sources {
                source_modes.insert(source.name().to_string(), SourceMode::Empty);
            }
            return self.assemble(query, Vec::new(), source_modes, contributed, false);
        }

        let per_source = query.limit / sources.len();
        let source_query = SearchQuery::new(&query.role, &query.location, per_source);
        let fallback_seed = self.config.fetch.seed;

        let mut join_set = JoinSet::new();
        for source in sources {
            let task_query = source_query.clone();
            join_set.spawn(async move {
                let name = source.name();
                let outcome = source.extract_listings(&task_query).await;
                (name, outcome)
            });
        }

        let deadline = Instant::now() + self.config.aggregation_timeout();
        let mut all_jobs: Vec<JobPosting> = Vec::new();
        let mut degraded = false;

        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok((name, Ok(jobs))))) => {
                    info!("Found {} jobs from {}", jobs.len(), name);
                    let mode = if name == "Sample" {
                        SourceMode::Sample
                    } else if jobs.is_empty() {
                        SourceMode::Empty
                    } else {
                        SourceMode::Live
                    };
                    source_modes.insert(name.to_string(), mode);
                    contributed.insert(name.to_string(), jobs.len());
                    all_jobs.extend(jobs);
                }
                Ok(Some(Ok((name, Err(e))))) => {
                    error!("Error scraping {}: {:#}", name, e);
                    let fallback = SampleSource::new(name, fallback_seed).generate(FALLBACK_BATCH);
                    info!("Added {} sample jobs as fallback for {}", fallback.len(), name);
                    source_modes.insert(name.to_string(), SourceMode::Sample);
                    contributed.insert(name.to_string(), fallback.len());
                    all_jobs.extend(fallback);
                }
                Ok(Some(Err(join_err))) => {
                    error!("Source task failed: {}", join_err);
                }
                Ok(None) => break,
                Err(_) => {
                    warn!("Aggregation timeout expired - abandoning in-flight sources");
                    join_set.abort_all();
                    degraded = true;
                    break;
                }
            }
        }

        all_jobs.truncate(query.limit);
        self.assemble(query, all_jobs, source_modes, contributed, degraded)
    }

    fn assemble(
        &self,
        query: SearchQuery,
        mut jobs: Vec<JobPosting>,
        mut source_modes: BTreeMap<String, SourceMode>,
        contributed: BTreeMap<String, usize>,
        degraded: bool,
    ) -> MarketAnalysis {
        // sources abandoned on timeout end up flagged empty
        for kind in &self.config.sources {
            source_modes
                .entry(kind.label().to_string())
                .or_insert(SourceMode::Empty);
        }

        let market_insights = build_insights(&mut jobs, self.config.top_skills);

        let unique_companies = jobs
            .iter()
            .map(|job| job.company.as_str())
            .filter(|company| *company != NOT_SPECIFIED)
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        let sources_used = contributed.values().filter(|count| **count > 0).count();

        MarketAnalysis {
            aggregation: AggregationStats {
                total_jobs_found: jobs.len(),
                sources_used,
                unique_companies,
                date_range: DATE_RANGE.to_string(),
                source_modes,
                degraded,
            },
            market_insights,
            jobs,
            search_query: query,
        }
    }
}

/// Extract skills per posting, tally market frequency (de-duplicated
/// per posting) and derive the histograms.
pub(crate) fn build_insights(jobs: &mut [JobPosting], top_n: usize) -> MarketInsights {
    let mut skill_frequency: BTreeMap<String, usize> = BTreeMap::new();
    let mut experience: BTreeMap<String, usize> = BTreeMap::new();
    let mut locations: BTreeMap<String, usize> = BTreeMap::new();

    for job in jobs.iter_mut() {
        let skills = extract_skills(&job.description);
        for skill in &skills {
            *skill_frequency.entry(canonical_key(skill)).or_insert(0) += 1;
        }
        job.extracted_skills = skills;

        *experience
            .entry(job.experience_level.to_lowercase())
            .or_insert(0) += 1;

        let city = job
            .location
            .split(',')
            .next()
            .unwrap_or(&job.location)
            .trim()
            .to_string();
        *locations.entry(city).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&String, &usize)> = skill_frequency.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let top_skills = ranked
        .into_iter()
        .take(top_n)
        .map(|(skill, _)| title_case(skill))
        .collect();

    let mut ranked_locations: Vec<(String, usize)> = locations.into_iter().collect();
    ranked_locations.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let location_distribution = ranked_locations.into_iter().take(TOP_LOCATIONS).collect();

    MarketInsights {
        top_skills,
        skill_frequency,
        experience_distribution: experience,
        location_distribution,
    }
}
