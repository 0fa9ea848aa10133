//! Snapshot types for the mirrored message feed
//!
//! A snapshot is the complete immutable in-memory copy of upstream records
//! held by the service between reloads. It is built once by the loader and
//! published atomically; readers never observe a partially built snapshot.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single upstream message record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique upstream identifier
    pub id: String,
    /// Author identifier
    pub user_id: String,
    /// Author display name
    pub user_name: String,
    /// Upstream-provided timestamp, kept opaque
    pub timestamp: String,
    /// Free-text message body
    pub message: String,
}

impl Message {
    /// Case-insensitive substring match against the body and the author name.
    /// The needle must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.message.to_lowercase().contains(needle)
            || self.user_name.to_lowercase().contains(needle)
    }
}

/// The complete in-memory copy of the upstream feed
#[derive(Debug, Clone)]
pub struct Snapshot {
    messages: Vec<Message>,
    expected_total: u64,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Create a snapshot from fetched records and the upstream-reported total
    pub fn new(messages: Vec<Message>, expected_total: u64) -> Self {
        Self {
            messages,
            expected_total,
            loaded_at: Utc::now(),
        }
    }

    /// Records in original fetch order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record count the upstream reported when the snapshot was built
    pub fn expected_total(&self) -> u64 {
        self.expected_total
    }

    /// When the snapshot was built
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Fraction of the upstream-reported total actually cached
    pub fn completeness(&self) -> f64 {
        if self.expected_total == 0 {
            1.0
        } else {
            self.messages.len() as f64 / self.expected_total as f64
        }
    }

    /// Whether every upstream record made it into the cache
    pub fn is_complete(&self) -> bool {
        self.messages.len() as u64 == self.expected_total
    }
}

/// Atomic publication point for the snapshot
///
/// Wraps a write-once cell: the snapshot is either entirely absent or entirely
/// complete. The single write happens-before every read, so concurrent readers
/// need no further coordination.
#[derive(Clone, Default)]
pub struct SnapshotCell {
    inner: Arc<OnceCell<Arc<Snapshot>>>,
}

impl SnapshotCell {
    /// Create an empty, unpublished cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fully built snapshot. Returns false if one was already published.
    pub fn publish(&self, snapshot: Snapshot) -> bool {
        self.inner.set(Arc::new(snapshot)).is_ok()
    }

    /// The published snapshot, if any
    pub fn get(&self) -> Option<Arc<Snapshot>> {
        self.inner.get().cloned()
    }

    /// Whether a snapshot has been published
    pub fn is_published(&self) -> bool {
        self.inner.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, user_name: &str, body: &str) -> Message {
        Message {
            id: id.to_string(),
            user_id: format!("user-{}", id),
            user_name: user_name.to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            message: body.to_string(),
        }
    }

    #[test]
    fn test_matches_body_and_user_name() {
        let msg = message("1", "Alice", "Hello World");
        assert!(msg.matches("hello"));
        assert!(msg.matches("alice"));
        assert!(!msg.matches("bob"));
    }

    #[test]
    fn test_matches_expects_lowercased_needle() {
        let msg = message("1", "alice", "hello");
        assert!(!msg.matches("HELLO"));
    }

    #[test]
    fn test_completeness() {
        let full = Snapshot::new(vec![message("1", "a", "x"), message("2", "b", "y")], 2);
        assert!(full.is_complete());
        assert_eq!(full.completeness(), 1.0);

        let partial = Snapshot::new(vec![message("1", "a", "x")], 4);
        assert!(!partial.is_complete());
        assert_eq!(partial.completeness(), 0.25);

        let empty = Snapshot::new(vec![], 0);
        assert!(empty.is_complete());
        assert_eq!(empty.completeness(), 1.0);
    }

    #[test]
    fn test_cell_publishes_once() {
        let cell = SnapshotCell::new();
        assert!(!cell.is_published());
        assert!(cell.get().is_none());

        assert!(cell.publish(Snapshot::new(vec![message("1", "a", "x")], 1)));
        assert!(cell.is_published());
        assert_eq!(cell.get().unwrap().len(), 1);

        // A second publish is rejected and leaves the first snapshot in place
        assert!(!cell.publish(Snapshot::new(vec![], 0)));
        assert_eq!(cell.get().unwrap().len(), 1);
    }

    #[test]
    fn test_cell_clones_share_state() {
        let cell = SnapshotCell::new();
        let other = cell.clone();
        cell.publish(Snapshot::new(vec![], 0));
        assert!(other.is_published());
    }
}
