//! MsgCache-RS: a cached message search service written in Rust
//!
//! Mirrors a paginated upstream message feed into an in-memory snapshot at
//! startup, then serves substring search queries entirely from that snapshot.

pub mod config;
pub mod loader;
pub mod metrics;
pub mod search;
pub mod snapshot;
pub mod upstream;
pub mod web;

pub use config::Settings;
pub use loader::{LoadOutcome, Loader};
pub use search::{QueryEngine, SearchResult};
pub use snapshot::{Message, Snapshot, SnapshotCell};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed upstream pagination unit, independent of the caller-facing search limit
pub const UPSTREAM_PAGE_SIZE: u32 = 100;
