//! Wire types for the upstream feed API

use crate::snapshot::Message;
use serde::{Deserialize, Serialize};

/// One page of the paginated feed response
///
/// Both fields default when absent, matching the feed's behavior of omitting
/// them on empty results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    /// Authoritative record count across all pages
    #[serde(default)]
    pub total: u64,
    /// Records for this page
    #[serde(default)]
    pub items: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let page: FeedPage = serde_json::from_str("{}").unwrap();
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_decodes() {
        let body = r#"{
            "total": 2,
            "items": [
                {"id": "1", "user_id": "u1", "user_name": "alice", "timestamp": "t", "message": "hi"},
                {"id": "2", "user_id": "u2", "user_name": "bob", "timestamp": "t", "message": "yo"}
            ]
        }"#;
        let page: FeedPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].user_name, "alice");
    }
}
