// src/skills.rs
//! Skill extraction and validation.
//!
//! Two trust levels feed this module: free text scanned directly
//! against a fixed vocabulary (trusted), and candidate lists produced
//! by an external extraction service (untrusted, must be validated
//! before they reach the matcher).

use crate::util::title_case;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Vocabulary scanned for in posting descriptions. Lowercase canonical
/// keys; display form is the title-cased key.
pub const TECH_SKILLS: &[&str] = &[
    "python", "java", "javascript", "react", "angular", "vue", "node.js", "express",
    "sql", "mysql", "postgresql", "mongodb", "redis", "aws", "azure", "gcp",
    "docker", "kubernetes", "git", "linux", "spring", "django", "flask",
    "tensorflow", "pytorch", "machine learning", "data science", "api",
    "rest", "graphql", "html", "css", "bootstrap", "jquery", "typescript",
];

/// Larger trusted vocabulary used to validate externally produced
/// candidate skills.
pub const TRUSTED_SKILLS: &[&str] = &[
    "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "C", "Go", "Rust",
    "Swift", "Kotlin", "PHP", "React", "Angular", "Vue.js", "Svelte", "Django",
    "Flask", "FastAPI", "Spring", "Node.js", "Express", "TensorFlow", "PyTorch",
    "Pandas", "NumPy", "Bootstrap", "jQuery", "SQL", "MySQL", "PostgreSQL",
    "MongoDB", "Redis", "Oracle", "SQLite", "AWS", "Azure", "GCP", "Docker",
    "Kubernetes", "Jenkins", "GitLab CI", "Terraform", "Git", "Linux", "Bash",
    "REST API", "GraphQL", "API", "CI/CD", "Agile", "Scrum", "Machine Learning",
    "Deep Learning", "Data Science", "AI", "NLP", "Computer Vision",
    "Cybersecurity", "DevOps", "Microservices", "Testing", "JUnit", "Selenium",
];

/// Descriptions shorter than this carry no extractable signal.
const MIN_TEXT_LEN: usize = 20;

fn vocabulary_patterns() -> &'static Vec<(&'static str, Regex)> {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TECH_SKILLS
            .iter()
            .map(|skill| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(skill));
                // vocabulary entries are static and known-valid
                (*skill, Regex::new(&pattern).expect("invalid vocabulary pattern"))
            })
            .collect()
    })
}

/// Lowercase trimmed form used as the counting key.
pub fn canonical_key(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Scan free text for vocabulary entries using case-insensitive,
/// word-boundary matching. Returns the de-duplicated set in title-case
/// display form, sorted for determinism.
pub fn extract_skills(text: &str) -> Vec<String> {
    if text.len() < MIN_TEXT_LEN {
        return Vec::new();
    }

    let mut found = BTreeSet::new();
    for (skill, pattern) in vocabulary_patterns() {
        if pattern.is_match(text) {
            found.insert(title_case(skill));
        }
    }
    found.into_iter().collect()
}

/// Result of cross-checking externally produced candidates against the
/// trusted vocabulary. Uncertain entries are surfaced to the caller but
/// excluded from downstream matching unless explicitly accepted.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub validated: Vec<String>,
    pub uncertain: Vec<String>,
}

/// Validate candidate skills by exact lowercase match, then by
/// whitespace-stripped match. Original casing of accepted candidates is
/// preserved.
pub fn validate_skills(candidates: &[String]) -> ValidationOutcome {
    let exact: BTreeSet<String> = TRUSTED_SKILLS.iter().map(|s| s.to_lowercase()).collect();
    let collapsed: BTreeSet<String> = TRUSTED_SKILLS
        .iter()
        .map(|s| s.to_lowercase().replace(' ', ""))
        .collect();

    let mut validated = Vec::new();
    let mut uncertain = Vec::new();

    for candidate in candidates {
        let normalized = canonical_key(candidate);
        if exact.contains(&normalized) || collapsed.contains(&normalized.replace(' ', "")) {
            validated.push(candidate.clone());
        } else {
            uncertain.push(candidate.clone());
        }
    }

    ValidationOutcome {
        validated,
        uncertain,
    }
}
