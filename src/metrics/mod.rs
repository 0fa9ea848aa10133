//! Metrics collection module
//!
//! Tracks request counts and a rolling window of search latencies for the
//! stats endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Number of latency samples kept in the rolling window
const LATENCY_WINDOW: usize = 100;

/// Request counters and latency samples
pub struct Metrics {
    total_searches: AtomicU64,
    unavailable_responses: AtomicU64,
    rejected_requests: AtomicU64,
    search_latencies_us: RwLock<Vec<u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            unavailable_responses: AtomicU64::new(0),
            rejected_requests: AtomicU64::new(0),
            search_latencies_us: RwLock::new(Vec::new()),
        }
    }

    /// Record a served search and its latency
    pub fn record_search(&self, latency: Duration) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);

        let mut latencies = self.search_latencies_us.write().unwrap();
        if latencies.len() >= LATENCY_WINDOW {
            latencies.remove(0);
        }
        latencies.push(latency.as_micros() as u64);
    }

    /// Record a request refused because no snapshot is available
    pub fn record_unavailable(&self) {
        self.unavailable_responses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request rejected at validation
    pub fn record_rejected(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Total searches served
    pub fn total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Total unavailable responses
    pub fn unavailable_responses(&self) -> u64 {
        self.unavailable_responses.load(Ordering::Relaxed)
    }

    /// Total rejected requests
    pub fn rejected_requests(&self) -> u64 {
        self.rejected_requests.load(Ordering::Relaxed)
    }

    /// Average search latency over the rolling window, in microseconds
    pub fn avg_search_latency_us(&self) -> Option<u64> {
        let latencies = self.search_latencies_us.read().unwrap();
        if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<u64>() / latencies.len() as u64)
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_search(Duration::from_micros(100));
        metrics.record_search(Duration::from_micros(300));
        metrics.record_unavailable();
        metrics.record_rejected();

        assert_eq!(metrics.total_searches(), 2);
        assert_eq!(metrics.unavailable_responses(), 1);
        assert_eq!(metrics.rejected_requests(), 1);
        assert_eq!(metrics.avg_search_latency_us(), Some(200));
    }

    #[test]
    fn test_latency_window_is_bounded() {
        let metrics = Metrics::new();
        for _ in 0..150 {
            metrics.record_search(Duration::from_micros(50));
        }
        assert_eq!(metrics.total_searches(), 150);
        assert_eq!(metrics.avg_search_latency_us(), Some(50));
        assert!(metrics.search_latencies_us.read().unwrap().len() <= LATENCY_WINDOW);
    }

    #[test]
    fn test_no_latency_without_searches() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_search_latency_us(), None);
    }
}
