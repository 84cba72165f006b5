// src/sources/timesjobs.rs
use super::{select_cards, select_first_text, SourceExtractor};
use crate::fetcher::{FetchPolicy, RateLimitedFetcher};
use crate::types::{JobPosting, SearchQuery, NOT_SPECIFIED};
use crate::util::clean_text;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{info, warn};

const SEARCH_BASE: &str = "https://www.timesjobs.com/candidate/job-search.html";

const CARD_SELECTORS: &[&str] = &["li.clearfix.job-bx.wht-shd-bx", "li.job-bx"];

const TITLE_SELECTORS: &[&str] = &["h2 a", "h2"];

const COMPANY_SELECTORS: &[&str] = &["h3.joblist-comp-name"];

const LOCATION_SELECTORS: &[&str] = &["ul.top-jd-dtl li span", "ul.top-jd-dtl li"];

const DESCRIPTION_SELECTORS: &[&str] = &["ul.list-job-dtl li", "ul.list-job-dtl"];

const DATE_SELECTORS: &[&str] = &["span.sim-posted span"];

pub struct TimesJobsSource {
    fetcher: RateLimitedFetcher,
}

impl TimesJobsSource {
    pub fn new(policy: FetchPolicy) -> Result<Self> {
        Ok(Self {
            fetcher: RateLimitedFetcher::new(policy)?,
        })
    }

    fn search_url(query: &SearchQuery) -> Result<Url> {
        Url::parse_with_params(
            SEARCH_BASE,
            &[
                ("searchType", "personalizedSearch"),
                ("from", "submit"),
                ("txtKeywords", query.role.as_str()),
                ("txtLocation", query.location.as_str()),
            ],
        )
        .context("Failed to build TimesJobs search URL")
    }

    pub(crate) fn parse_listings(html: &str, query: &SearchQuery) -> Vec<JobPosting> {
        let document = Html::parse_document(html);
        let cards = select_cards(&document, CARD_SELECTORS);
        if cards.is_empty() {
            warn!("No TimesJobs listings found with any selector");
            return Vec::new();
        }

        let experience_selector = Selector::parse("ul.top-jd-dtl li").ok();

        let mut postings = Vec::new();
        for card in cards.into_iter().take(query.limit) {
            let mut posting = JobPosting::for_source("TimesJobs");

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
            if let Some(description) = select_first_text(card, DESCRIPTION_SELECTORS) {
                posting.description = description;
            }
            if let Some(date) = select_first_text(card, DATE_SELECTORS) {
                posting.posted_date = date;
            }

            // experience lives in an unlabeled detail list entry
            if let Some(selector) = &experience_selector {
                for item in card.select(selector) {
                    let text = clean_text(&item.text().collect::<Vec<_>>().join(" "));
                    if text.to_lowercase().contains("yrs") {
                        posting.experience_level = text;
                        break;
                    }
                }
            }

            if let Some(href) = title_link(card) {
                posting.url = href;
            }

            if !posting.has_usable_fields() {
                warn!("Skipping TimesJobs listing with no usable fields");
                continue;
            }

            postings.push(posting);
        }

        postings
    }
}

fn title_link(card: scraper::ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("h2 a").ok()?;
    card.select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

#[async_trait]
impl SourceExtractor for TimesJobsSource {
    fn name(&self) -> &'static str {
        "TimesJobs"
    }

    async fn extract_listings(&self, query: &SearchQuery) -> Result<Vec<JobPosting>> {
        let url = Self::search_url(query)?;
        info!("Scraping TimesJobs: {}", url);

        let html = self.fetcher.fetch(url.as_str()).await.with_context(|| {
            format!("Failed to fetch TimesJobs search page for '{}'", query.role)
        })?;

        let postings = Self::parse_listings(&html, query);
        info!("Found {} TimesJobs listings", postings.len());

        Ok(postings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"
        <html><body><ul>
          <li class="clearfix job-bx wht-shd-bx">
            <h2><a href="https://www.timesjobs.com/job/12345">Full Stack Developer</a></h2>
            <h3 class="joblist-comp-name">Initech Solutions</h3>
            <ul class="top-jd-dtl">
              <li><span>Hyderabad, Telangana</span></li>
              <li>0 - 1 yrs</li>
            </ul>
            <ul class="list-job-dtl">
              <li>Build APIs with Node.js, Express and MongoDB. React on the frontend.</li>
            </ul>
            <span class="sim-posted"><span>Posted few days ago</span></span>
          </li>
          <li class="clearfix job-bx wht-shd-bx"></li>
        </ul></body></html>
    "#;

    fn query(limit: usize) -> SearchQuery {
        SearchQuery::new("Full Stack Developer", "India", limit)
    }

    #[test]
    fn test_parse_listings_extracts_fields() {
        let postings = TimesJobsSource::parse_listings(SEARCH_FIXTURE, &query(10));
        assert_eq!(postings.len(), 1);

        let job = &postings[0];
        assert_eq!(job.title, "Full Stack Developer");
        assert_eq!(job.company, "Initech Solutions");
        assert_eq!(job.location, "Hyderabad, Telangana");
        assert_eq!(job.experience_level, "0 - 1 yrs");
        assert_eq!(job.url, "https://www.timesjobs.com/job/12345");
        assert_eq!(job.posted_date, "Posted few days ago");
        assert!(job.description.contains("Node.js"));
        assert_eq!(job.salary, NOT_SPECIFIED);
    }

    #[test]
    fn test_parse_listings_skips_unusable_card() {
        let postings = TimesJobsSource::parse_listings(SEARCH_FIXTURE, &query(10));
        assert_eq!(postings.len(), 1);
    }

    #[test]
    fn test_parse_listings_empty_document() {
        assert!(TimesJobsSource::parse_listings("<html></html>", &query(5)).is_empty());
    }
}
