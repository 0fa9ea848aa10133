//! Query engine over the cached snapshot

use super::models::SearchResult;
use crate::snapshot::{Message, SnapshotCell};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::warn;

/// Query-time errors visible to callers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// No snapshot is published, or the upstream feed had no records.
    /// Distinct from a query that matched nothing.
    #[error("no cached data is available")]
    Unavailable,
}

/// Serves substring search over the published snapshot
///
/// The snapshot is immutable once published, so reads take shared references
/// with no locking. This path never suspends.
pub struct QueryEngine {
    snapshot: SnapshotCell,
    slow_query: Duration,
}

impl QueryEngine {
    /// Create an engine reading from the given publication cell
    pub fn new(snapshot: SnapshotCell, slow_query: Duration) -> Self {
        Self {
            snapshot,
            slow_query,
        }
    }

    /// Case-insensitive substring search with pagination
    ///
    /// A record matches when its body or author name contains the query,
    /// ignoring case. Matches keep their original fetch order. `page` is
    /// 1-indexed; a page past the last match returns an empty item list with
    /// the correct `total_matches`.
    pub fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchResult, SearchError> {
        let snapshot = match self.snapshot.get() {
            Some(snapshot) if !snapshot.is_empty() => snapshot,
            _ => return Err(SearchError::Unavailable),
        };

        let started = Instant::now();
        let needle = query.to_lowercase();

        let matches: Vec<&Message> = snapshot
            .messages()
            .iter()
            .filter(|message| message.matches(&needle))
            .collect();

        let total_matches = matches.len();
        let start = (page as usize).saturating_sub(1) * limit as usize;
        let items = matches
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();

        let elapsed = started.elapsed();
        if elapsed > self.slow_query {
            warn!(
                "slow search: scanned {} records in {:?}",
                snapshot.len(),
                elapsed
            );
        }

        Ok(SearchResult {
            total_matches,
            page_number: page,
            page_limit: limit,
            items,
        })
    }
}
