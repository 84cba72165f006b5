// src/sources/indeed.rs
use super::{select_cards, select_document_text, select_first_text, SourceExtractor};
use crate::fetcher::{FetchPolicy, RateLimitedFetcher};
use crate::types::{JobPosting, SearchQuery, NOT_SPECIFIED};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use scraper::Html;
use tracing::{info, warn};

const SEARCH_BASE: &str = "https://in.indeed.com/jobs";
const VIEW_BASE: &str = "https://in.indeed.com/viewjob";

const CARD_SELECTORS: &[&str] = &[
    "div.job_seen_beacon",
    "div[data-jk]",
    "div.jobsearch-SerpJobCard",
];

const TITLE_SELECTORS: &[&str] = &[
    "h2.jobTitle a",
    "h2.jobTitle span",
    "a.jobTitle",
    "h2[data-testid='job-title']",
];

const COMPANY_SELECTORS: &[&str] = &[
    "span.companyName",
    "span[data-testid='company-name']",
    "span[class*='company']",
];

const LOCATION_SELECTORS: &[&str] = &[
    "div[data-testid='text-location']",
    "div[data-testid='job-location']",
    "div.company_location",
    "div[class*='location']",
];

const SALARY_SELECTORS: &[&str] = &[
    "div.salary-snippet-container",
    "span.estimated-salary",
    "div[class*='salary']",
];

const DATE_SELECTORS: &[&str] = &["span.date", "span[data-testid='myJobsStateDate']"];

const SUMMARY_SELECTORS: &[&str] = &["div.job-snippet", "td.resultContent div[class*='snippet']"];

const DETAIL_SELECTORS: &[&str] = &[
    "div#jobDescriptionText",
    "div.jobDescriptionText",
    "div[itemprop='description']",
    "div.description",
];

pub struct IndeedSource {
    fetcher: RateLimitedFetcher,
}

impl IndeedSource {
    pub fn new(policy: FetchPolicy) -> Result<Self> {
        Ok(Self {
            fetcher: RateLimitedFetcher::new(policy)?,
        })
    }

    fn search_url(query: &SearchQuery) -> Result<Url> {
        Url::parse_with_params(
            SEARCH_BASE,
            &[("q", query.role.as_str()), ("l", query.location.as_str())],
        )
        .context("Failed to build Indeed search URL")
    }

    /// Parse the search page into postings. Separated from fetching so
    /// extraction can be tested on static HTML.
    pub(crate) fn parse_listings(html: &str, query: &SearchQuery) -> Vec<JobPosting> {
        let document = Html::parse_document(html);
        let cards = select_cards(&document, CARD_SELECTORS);
        if cards.is_empty() {
            warn!("No Indeed job cards found with any selector");
            return Vec::new();
        }

        let mut postings = Vec::new();
        for card in cards.into_iter().take(query.limit) {
            let mut posting = JobPosting::for_source("Indeed");

            if let Some(title) = select_first_text(card, TITLE_SELECTORS) {
                posting.title = title;
            }
            if let Some(company) = select_first_text(card, COMPANY_SELECTORS) {
                posting.company = company;
            }
            if let Some(location) = select_first_text(card, LOCATION_SELECTORS) {
                posting.location = location;
            } else {
                posting.location = query.location.clone();
            }
            if let Some(salary) = select_first_text(card, SALARY_SELECTORS) {
                posting.salary = salary;
            }
            if let Some(date) = select_first_text(card, DATE_SELECTORS) {
                posting.posted_date = date;
            }
            if let Some(summary) = select_first_text(card, SUMMARY_SELECTORS) {
                posting.description = summary;
            }

            if let Some(job_key) = card.value().attr("data-jk") {
                posting.url = format!("{}?jk={}", VIEW_BASE, job_key);
            }

            if posting.title.to_lowercase().contains("fresher") {
                posting.experience_level = "Entry level".to_string();
            }

            if !posting.has_usable_fields() {
                warn!("Skipping Indeed card with no usable fields");
                continue;
            }

            if posting.description == NOT_SPECIFIED && posting.title != NOT_SPECIFIED {
                // summary-level fallback keeps skill extraction total
                posting.description = format!(
                    "{} position at {} in {}",
                    posting.title, posting.company, posting.location
                );
            }

            postings.push(posting);
        }

        postings
    }

    /// Optional enrichment: replace the summary description with the
    /// detail page's full text. Failure degrades to the summary.
    async fn enrich_description(&self, posting: &mut JobPosting) {
        if posting.url == NOT_SPECIFIED {
            return;
        }
        match self.fetcher.fetch(&posting.url).await {
            Ok(html) => {
                let document = Html::parse_document(&html);
                if let Some(detail) = select_document_text(&document, DETAIL_SELECTORS) {
                    posting.description = detail;
                }
            }
            Err(e) => {
                warn!("Detail fetch failed for {}: {}", posting.url, e);
            }
        }
    }
}

#[async_trait]
impl SourceExtractor for IndeedSource {
    fn name(&self) -> &'static str {
        "Indeed"
    }

    async fn extract_listings(&self, query: &SearchQuery) -> Result<Vec<JobPosting>> {
        let url = Self::search_url(query)?;
        info!("Scraping Indeed: {}", url);

        let html = self
            .fetcher
            .fetch(url.as_str())
            .await
            .with_context(|| format!("Failed to fetch Indeed search page for '{}'", query.role))?;

        let mut postings = Self::parse_listings(&html, query);
        info!("Found {} Indeed listings", postings.len());

        for posting in postings.iter_mut() {
            self.enrich_description(posting).await;
        }

        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"
        <html><body>
          <div class="job_seen_beacon" data-jk="abc123">
            <h2 class="jobTitle"><a>Python Developer - Fresher</a></h2>
            <span class="companyName">Acme Systems</span>
            <div data-testid="text-location">Bangalore, Karnataka</div>
            <div class="job-snippet">Work with Python, Django and SQL daily.</div>
          </div>
          <div class="job_seen_beacon" data-jk="def456">
            <h2 class="jobTitle"><a>Java Developer</a></h2>
            <span class="companyName">Globex</span>
          </div>
          <div class="job_seen_beacon"></div>
        </body></html>
    "#;

    fn query(limit: usize) -> SearchQuery {
        SearchQuery::new("Python Developer", "India", limit)
    }

    #[test]
    fn test_parse_listings_extracts_fields() {
        let postings = IndeedSource::parse_listings(SEARCH_FIXTURE, &query(10));
        assert_eq!(postings.len(), 2);

        let first = &postings[0];
        assert_eq!(first.title, "Python Developer - Fresher");
        assert_eq!(first.company, "Acme Systems");
        assert_eq!(first.location, "Bangalore, Karnataka");
        assert_eq!(first.url, "https://in.indeed.com/viewjob?jk=abc123");
        assert_eq!(first.experience_level, "Entry level");
        assert_eq!(first.source, "Indeed");
    }

    #[test]
    fn test_parse_listings_defaults_missing_fields() {
        let postings = IndeedSource::parse_listings(SEARCH_FIXTURE, &query(10));
        let second = &postings[1];
        assert_eq!(second.salary, NOT_SPECIFIED);
        assert_eq!(second.posted_date, NOT_SPECIFIED);
        // summary fallback synthesized from extracted fields
        assert!(second.description.contains("Java Developer"));
    }

    #[test]
    fn test_parse_listings_skips_empty_card() {
        // third card has no usable fields and is dropped, not defaulted
        let postings = IndeedSource::parse_listings(SEARCH_FIXTURE, &query(10));
        assert_eq!(postings.len(), 2);
    }

    #[test]
    fn test_parse_listings_respects_limit() {
        let postings = IndeedSource::parse_listings(SEARCH_FIXTURE, &query(1));
        assert_eq!(postings.len(), 1);
    }

    #[test]
    fn test_parse_listings_empty_document() {
        let postings = IndeedSource::parse_listings("<html></html>", &query(5));
        assert!(postings.is_empty());
    }
}
