// src/sources/mod.rs
//! Source extractors: one strategy per external job portal, selected
//! by configuration. All variants implement [`SourceExtractor`] and
//! share the selector-list field extraction helpers below.

use crate::fetcher::FetchPolicy;
use crate::types::{JobPosting, SearchQuery};
use crate::util::clean_text;
use anyhow::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

pub mod indeed;
pub mod sample;
pub mod timesjobs;

pub use indeed::IndeedSource;
pub use sample::SampleSource;
pub use timesjobs::TimesJobsSource;

/// Extraction strategies available to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Indeed,
    TimesJobs,
    /// Synthetic postings only; useful offline and as the fallback
    /// shape for failed live sources.
    Sample,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Indeed => "Indeed",
            SourceKind::TimesJobs => "TimesJobs",
            SourceKind::Sample => "Sample",
        }
    }

    pub fn build(&self, policy: FetchPolicy) -> Result<Box<dyn SourceExtractor>> {
        Ok(match self {
            SourceKind::Indeed => Box::new(IndeedSource::new(policy)?),
            SourceKind::TimesJobs => Box::new(TimesJobsSource::new(policy)?),
            SourceKind::Sample => Box::new(SampleSource::new("Sample", policy.seed)),
        })
    }
}

/// Capability shared by every source variant.
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch and parse up to `query.limit` postings. A failure on one
    /// listing skips that listing; a failure on the whole search page
    /// surfaces as an error for the aggregator to recover from.
    async fn extract_listings(&self, query: &SearchQuery) -> Result<Vec<JobPosting>>;
}

/// First non-empty text match from an ordered selector list, scoped to
/// one listing element.
pub(crate) fn select_first_text(element: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(found) = element.select(&selector).next() {
                let text = clean_text(&found.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// Document-scoped variant of [`select_first_text`].
pub(crate) fn select_document_text(document: &Html, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(found) = document.select(&selector).next() {
                let text = clean_text(&found.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// Listing containers located by the first selector that yields any
/// elements; returns the matching selector's elements.
pub(crate) fn select_cards<'a>(document: &'a Html, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            let elements: Vec<ElementRef<'a>> = document.select(&selector).collect();
            if !elements.is_empty() {
                return elements;
            }
        }
    }
    Vec::new()
}
