use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; event-scraper/1.0)";
const MAX_REDIRECTS: usize = 5;

/// Result of one fetch attempt. Failures carry a human-readable cause and
/// never abort the run; the caller logs and moves on.
#[derive(Debug)]
pub enum FetchOutcome {
    Page {
        url: String,
        status: u16,
        body: String,
    },
    Failed {
        url: String,
        cause: String,
    },
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch one URL. Non-2xx statuses and network-level errors (DNS,
    /// connection refused, timeout) both come back as `Failed`.
    pub async fn get(&self, url: &str) -> FetchOutcome {
        let start = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return FetchOutcome::Failed {
                    url: url.to_string(),
                    cause: e.to_string(),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Fetch failed for {}: HTTP {}", url, status);
            return FetchOutcome::Failed {
                url: url.to_string(),
                cause: format!("HTTP {}", status),
            };
        }

        match response.text().await {
            Ok(body) => {
                debug!(
                    "Fetched {} ({} bytes, {} ms)",
                    url,
                    body.len(),
                    start.elapsed().as_millis()
                );
                FetchOutcome::Page {
                    url: url.to_string(),
                    status: status.as_u16(),
                    body,
                }
            }
            Err(e) => {
                warn!("Failed to read body from {}: {}", url, e);
                FetchOutcome::Failed {
                    url: url.to_string(),
                    cause: e.to_string(),
                }
            }
        }
    }
}
