// src/sources/sample.rs
//! Synthetic sample postings. Substituted when a live source fails
//! persistently, or configured directly for offline use. Every posting
//! is tagged "(sample)" so consumers never mistake it for live data.

use super::SourceExtractor;
use crate::types::{JobPosting, SearchQuery};
use crate::util::SeededRng;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

/// Fallback batch size when a live source fails.
pub const FALLBACK_BATCH: usize = 3;

const SAMPLE_BATCH: usize = 5;

const ROLES: &[(&str, &[&str])] = &[
    ("Software Developer", &["Python", "Git", "SQL", "REST"]),
    ("Full Stack Developer", &["JavaScript", "React", "Node.js", "MongoDB"]),
    ("Python Developer", &["Python", "Django", "Flask", "PostgreSQL"]),
    ("Java Developer", &["Java", "Spring", "MySQL", "Git"]),
    ("Data Scientist", &["Python", "Machine Learning", "TensorFlow", "SQL"]),
    ("Machine Learning Engineer", &["Python", "PyTorch", "Docker", "AWS"]),
    ("DevOps Engineer", &["Docker", "Kubernetes", "Linux", "AWS"]),
    ("Frontend Developer", &["HTML", "CSS", "JavaScript", "React"]),
    ("Backend Developer", &["Node.js", "Express", "SQL", "Redis"]),
];

const COMPANIES: &[&str] = &[
    "Tech Solutions Pvt Ltd",
    "Digital Innovations",
    "Innovation Labs",
    "Future Technologies",
    "Global Systems",
    "NextGen Solutions",
];

const CITIES: &[&str] = &["Bangalore", "Hyderabad", "Pune", "Chennai"];

pub struct SampleSource {
    label: String,
    seed: u64,
}

impl SampleSource {
    /// `label` names the source this batch stands in for.
    pub fn new(label: &str, seed: u64) -> Self {
        Self {
            label: label.to_string(),
            seed,
        }
    }

    pub fn source_tag(&self) -> String {
        format!("{} (sample)", self.label)
    }

    /// Deterministic batch of realistic postings for the given seed.
    pub fn generate(&self, count: usize) -> Vec<JobPosting> {
        let mut rng = SeededRng::new(self.seed);
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let source = self.source_tag();

        (0..count)
            .map(|i| {
                let (role, skills) = *rng.pick(ROLES);
                let company = *rng.pick(COMPANIES);
                let city = *rng.pick(CITIES);

                let mut posting = JobPosting::for_source(&source);
                posting.title = format!("{} - Fresher", role);
                posting.company = company.to_string();
                posting.location = city.to_string();
                posting.description = format!(
                    "Looking for fresh {} graduates with hands-on exposure to {}. \
                     Strong problem-solving abilities and knowledge of modern \
                     development practices preferred.",
                    role,
                    skills.join(", ")
                );
                posting.url = format!(
                    "https://{}.example/jobs/sample_{}",
                    self.label.to_lowercase(),
                    i
                );
                posting.posted_date = today.clone();
                posting.salary = "₹4-8 Lakhs".to_string();
                posting.experience_level = "0-1 years".to_string();
                posting
            })
            .collect()
    }
}

#[async_trait]
impl SourceExtractor for SampleSource {
    fn name(&self) -> &'static str {
        "Sample"
    }

    async fn extract_listings(&self, query: &SearchQuery) -> Result<Vec<JobPosting>> {
        Ok(self.generate(query.limit.min(SAMPLE_BATCH)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let a = SampleSource::new("Indeed", 9).generate(5);
        let b = SampleSource::new("Indeed", 9).generate(5);
        assert_eq!(a.len(), 5);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.title, y.title);
            assert_eq!(x.company, y.company);
            assert_eq!(x.location, y.location);
        }
    }

    #[test]
    fn test_generate_marks_postings_as_sample() {
        let postings = SampleSource::new("Indeed", 1).generate(3);
        assert!(postings.iter().all(|p| p.source == "Indeed (sample)"));
    }

    #[test]
    fn test_descriptions_carry_extractable_skills() {
        let postings = SampleSource::new("TimesJobs", 2).generate(5);
        for posting in &postings {
            assert!(!crate::skills::extract_skills(&posting.description).is_empty());
        }
    }

    #[tokio::test]
    async fn test_extract_listings_respects_limit() {
        let source = SampleSource::new("Sample", 3);
        let query = SearchQuery::new("Software Developer", "India", 2);
        let postings = source.extract_listings(&query).await.unwrap();
        assert_eq!(postings.len(), 2);
    }
}
