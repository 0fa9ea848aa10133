//! Search response models

use crate::snapshot::Message;
use serde::{Deserialize, Serialize};

/// Paginated search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Records matching the query across all pages
    pub total_matches: usize,
    /// Echoed request page number
    pub page_number: u32,
    /// Echoed request page limit
    pub page_limit: u32,
    /// Matching records for the requested page
    pub items: Vec<Message>,
}
