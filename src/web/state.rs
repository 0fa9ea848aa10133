//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::search::QueryEngine;
use crate::snapshot::SnapshotCell;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Snapshot publication cell, shared with the loader task
    pub snapshot: SnapshotCell,
    /// Query engine reading from the cell
    pub engine: Arc<QueryEngine>,
    /// Request metrics
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state around a (possibly still empty) cell
    pub fn new(settings: Settings, snapshot: SnapshotCell) -> Self {
        let settings = Arc::new(settings);
        let engine = Arc::new(QueryEngine::new(
            snapshot.clone(),
            Duration::from_millis(settings.search.slow_query_ms),
        ));

        Self {
            settings,
            snapshot,
            engine,
            metrics: Arc::new(Metrics::new()),
        }
    }
}
