//! Startup cache population
//!
//! Fetches the entire upstream feed page-by-page into an immutable snapshot,
//! with bounded retries and exponential backoff per page. Only the first page
//! is load-critical: it carries the authoritative total. Every later page is
//! best-effort, and a page that exhausts its retries is recorded as a warning
//! rather than aborting the load.

mod retry;

pub use retry::{RetryPolicy, Sleeper, TokioSleeper};

use crate::config::UpstreamSettings;
use crate::snapshot::Snapshot;
use crate::upstream::{FeedClient, FeedPage, FetchError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// A non-critical page that still failed after all retries
#[derive(Debug)]
pub struct PageFailure {
    /// Offset of the failed page
    pub skip: u64,
    /// Attempts spent before giving up
    pub attempts: u32,
    /// Final error for the page
    pub error: FetchError,
}

/// Snapshot plus the page-level warnings accumulated while building it
#[derive(Debug)]
pub struct LoadOutcome {
    pub snapshot: Snapshot,
    pub warnings: Vec<PageFailure>,
}

impl LoadOutcome {
    /// Whether the load fetched every record without a dropped page
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty() && self.snapshot.is_complete()
    }
}

/// Load failures that leave the snapshot unpublished
#[derive(Debug, Error)]
pub enum LoadError {
    /// The first page never succeeded, so the total count is unknown
    #[error("initial page fetch failed after {attempts} attempts: {source}")]
    Critical { attempts: u32, source: FetchError },
    /// Too little of the feed was fetched to be worth serving
    #[error("cached {fetched} of {total} records, below the completeness floor of {floor}")]
    BelowCompletenessFloor {
        fetched: usize,
        total: u64,
        floor: f64,
    },
}

/// One-shot loader for the upstream feed
pub struct Loader {
    client: FeedClient,
    policy: RetryPolicy,
    page_size: u32,
    min_completeness: f64,
    sleeper: Arc<dyn Sleeper>,
}

impl Loader {
    /// Create a loader configured from upstream settings
    pub fn new(client: FeedClient, settings: &UpstreamSettings) -> Self {
        Self {
            client,
            policy: RetryPolicy::new(settings.max_retries, settings.base_delay()),
            page_size: settings.page_size.max(1),
            min_completeness: settings.min_completeness,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper; tests use this to skip real backoff delays
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Fetch the whole feed into a snapshot. Invoked exactly once at startup.
    pub async fn load(&self) -> Result<LoadOutcome, LoadError> {
        info!("starting initial feed load");

        let first = match self.fetch_with_retry(0).await {
            Ok(page) => page,
            Err(error) => {
                return Err(LoadError::Critical {
                    attempts: self.policy.max_attempts,
                    source: error,
                })
            }
        };

        let total = first.total;
        if total == 0 {
            info!("upstream reports no records");
            return Ok(LoadOutcome {
                snapshot: Snapshot::new(Vec::new(), 0),
                warnings: Vec::new(),
            });
        }

        let mut messages = first.items;
        let mut warnings = Vec::new();
        info!(
            "feed reports {} records, {} fetched from the first page",
            total,
            messages.len()
        );

        let mut skip = u64::from(self.page_size);
        while skip < total {
            // Courtesy pause before each follow-up page
            self.sleeper.sleep(self.policy.base_delay).await;

            match self.fetch_with_retry(skip).await {
                Ok(page) => messages.extend(page.items),
                Err(error) => {
                    warn!(
                        "dropping page at skip={} after {} attempts: {}",
                        skip, self.policy.max_attempts, error
                    );
                    warnings.push(PageFailure {
                        skip,
                        attempts: self.policy.max_attempts,
                        error,
                    });
                }
            }

            skip += u64::from(self.page_size);
        }

        let snapshot = Snapshot::new(messages, total);
        if !snapshot.is_complete() {
            warn!(
                "cached {} of {} records, search results will be incomplete",
                snapshot.len(),
                total
            );
        }

        if snapshot.completeness() < self.min_completeness {
            return Err(LoadError::BelowCompletenessFloor {
                fetched: snapshot.len(),
                total,
                floor: self.min_completeness,
            });
        }

        info!("feed load complete, cached {} messages", snapshot.len());
        Ok(LoadOutcome { snapshot, warnings })
    }

    /// Fetch one page, retrying with exponential backoff up to the policy limit
    async fn fetch_with_retry(&self, skip: u64) -> Result<FeedPage, FetchError> {
        let mut attempt = 0;
        loop {
            match self.client.fetch_page(skip, self.page_size).await {
                Ok(page) => return Ok(page),
                Err(error) if attempt + 1 < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "page fetch at skip={} failed on attempt {}/{}: {}, retrying in {:?}",
                        skip,
                        attempt + 1,
                        self.policy.max_attempts,
                        error,
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
