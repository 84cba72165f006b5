// src/fetcher.rs
//! Rate-limited HTTP retrieval with retry, identity rotation and
//! jittered delays toward flaky job portals.

use crate::util::SeededRng;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Browser identities rotated on access-denied responses.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("access denied (403)")]
    Blocked,
    #[error("rate limited (429)")]
    Throttled,
    #[error("unexpected HTTP status {0}")]
    Http(u16),
    #[error("failed to fetch {url} after {attempts} attempts")]
    Exhausted { url: String, attempts: u32 },
}

/// Immutable retry/etiquette settings. Passed into each fetch call;
/// there is no ambient session state to mutate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_jitter_ms: u64,
    pub throttle_cooldown_ms: u64,
    pub request_timeout_secs: u64,
    /// Seed for jitter and identity rotation; fixed seed gives a
    /// reproducible fetch schedule.
    pub seed: u64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2_000,
            max_jitter_ms: 2_000,
            throttle_cooldown_ms: 10_000,
            request_timeout_secs: 15,
            seed: 0x5EED,
        }
    }
}

impl FetchPolicy {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_jitter(&self) -> Duration {
        Duration::from_millis(self.max_jitter_ms)
    }

    pub fn throttle_cooldown(&self) -> Duration {
        Duration::from_millis(self.throttle_cooldown_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Derive a policy with a different seed, so parallel sources do
    /// not share one jitter schedule.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

pub struct RateLimitedFetcher {
    client: reqwest::Client,
    policy: FetchPolicy,
}

impl RateLimitedFetcher {
    pub fn new(policy: FetchPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(policy.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, policy })
    }

    /// Fetch one document body, retrying up to the policy budget.
    /// Blocks for the mandated pre-attempt delay on every attempt, so a
    /// single call can take several seconds even on success.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let client = self.client.clone();
        let target = url.to_string();

        run_with_retry(&self.policy, url, move |agent| {
            let client = client.clone();
            let target = target.clone();
            async move {
                let response = client
                    .get(&target)
                    .header(reqwest::header::USER_AGENT, agent)
                    .send()
                    .await
                    .map_err(|e| FetchError::Network(e.to_string()))?;

                match response.status().as_u16() {
                    200..=299 => response
                        .text()
                        .await
                        .map_err(|e| FetchError::Network(e.to_string())),
                    403 => Err(FetchError::Blocked),
                    429 => Err(FetchError::Throttled),
                    status => Err(FetchError::Http(status)),
                }
            }
        })
        .await
    }
}

/// Retry loop shared by the real fetcher and tests. Makes exactly
/// `policy.max_retries` attempts; each attempt is preceded by the
/// base delay plus jitter regardless of prior outcomes.
pub(crate) async fn run_with_retry<F, Fut>(
    policy: &FetchPolicy,
    url: &str,
    mut attempt: F,
) -> Result<String, FetchError>
where
    F: FnMut(&'static str) -> Fut,
    Fut: Future<Output = Result<String, FetchError>>,
{
    let mut rng = SeededRng::new(policy.seed);
    let mut identity = USER_AGENTS[rng.next_below(USER_AGENTS.len())];

    for attempt_no in 1..=policy.max_retries {
        let delay = policy.base_delay() + rng.jitter(policy.max_jitter());
        info!("Attempt {} for {} after {:?}", attempt_no, url, delay);
        tokio::time::sleep(delay).await;

        match attempt(identity).await {
            Ok(body) => return Ok(body),
            Err(FetchError::Blocked) => {
                warn!("403 Forbidden for {} - rotating identity", url);
                identity = rotate_identity(&mut rng, identity);
            }
            Err(FetchError::Throttled) => {
                let cooldown = policy.throttle_cooldown() + rng.jitter(policy.max_jitter());
                warn!("429 Too Many Requests for {} - cooling down {:?}", url, cooldown);
                tokio::time::sleep(cooldown).await;
            }
            Err(FetchError::Network(e)) => {
                warn!("Request failed for {}: {}", url, e);
            }
            Err(FetchError::Http(status)) => {
                warn!("HTTP {} for {}", status, url);
            }
            Err(exhausted @ FetchError::Exhausted { .. }) => return Err(exhausted),
        }
    }

    Err(FetchError::Exhausted {
        url: url.to_string(),
        attempts: policy.max_retries,
    })
}

fn rotate_identity(rng: &mut SeededRng, current: &'static str) -> &'static str {
    loop {
        let candidate = *rng.pick(USER_AGENTS);
        if candidate != current {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn quick_policy() -> FetchPolicy {
        FetchPolicy {
            max_retries: 3,
            base_delay_ms: 100,
            max_jitter_ms: 50,
            throttle_cooldown_ms: 500,
            request_timeout_secs: 1,
            seed: 42,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_terminates_after_budget() {
        let attempts = RefCell::new(0u32);
        let result = run_with_retry(&quick_policy(), "http://example.test", |_agent| {
            *attempts.borrow_mut() += 1;
            async { Err(FetchError::Network("connection refused".to_string())) }
        })
        .await;

        assert_eq!(*attempts.borrow(), 3);
        match result {
            Err(FetchError::Exhausted { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected Exhausted, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_stops_retrying() {
        let attempts = RefCell::new(0u32);
        let result = run_with_retry(&quick_policy(), "http://example.test", |_agent| {
            *attempts.borrow_mut() += 1;
            let n = *attempts.borrow();
            async move {
                if n < 2 {
                    Err(FetchError::Network("timeout".to_string()))
                } else {
                    Ok("body".to_string())
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "body");
        assert_eq!(*attempts.borrow(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocked_rotates_identity() {
        let identities = RefCell::new(Vec::new());
        let _ = run_with_retry(&quick_policy(), "http://example.test", |agent| {
            identities.borrow_mut().push(agent);
            async { Err(FetchError::Blocked) }
        })
        .await;

        let seen = identities.borrow();
        assert_eq!(seen.len(), 3);
        assert_ne!(seen[0], seen[1], "identity must change after a 403");
        assert_ne!(seen[1], seen[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_still_terminates() {
        let attempts = RefCell::new(0u32);
        let result = run_with_retry(&quick_policy(), "http://example.test", |_agent| {
            *attempts.borrow_mut() += 1;
            async { Err(FetchError::Throttled) }
        })
        .await;

        assert_eq!(*attempts.borrow(), 3);
        assert!(matches!(result, Err(FetchError::Exhausted { .. })));
    }
}
