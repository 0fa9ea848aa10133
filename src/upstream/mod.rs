//! Upstream feed module
//!
//! Provides the JSON-over-HTTP client for the paginated message feed.

mod client;
mod models;

pub use client::{FeedClient, FetchError};
pub use models::FeedPage;
