//! Settings structures for MsgCache-RS configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub search: SearchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            upstream: UpstreamSettings::default(),
            search: SearchSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (MSGCACHE_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("MSGCACHE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("MSGCACHE_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("MSGCACHE_UPSTREAM_URL") {
            self.upstream.url = val;
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Upstream feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Feed endpoint URL
    pub url: String,
    /// Records per upstream page; the feed caps this at 100
    pub page_size: u32,
    /// Per-request timeout in seconds
    pub request_timeout: f64,
    /// Attempts per page before giving up
    pub max_retries: u32,
    /// Base backoff delay in milliseconds; doubles on each retry
    pub base_delay_ms: u64,
    /// Minimum fetched/total ratio required to publish a partial snapshot
    pub min_completeness: f64,
}

impl UpstreamSettings {
    /// Base delay as a duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            url: "https://november7-730026606190.europe-west1.run.app/messages/".to_string(),
            page_size: crate::UPSTREAM_PAGE_SIZE,
            request_timeout: 30.0,
            max_retries: 5,
            base_delay_ms: 500,
            min_completeness: 0.5,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Page limit applied when the caller omits one
    pub default_limit: u32,
    /// Largest page limit a caller may request
    pub max_limit: u32,
    /// Scan latency above which a warning is logged, in milliseconds
    pub slow_query_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            slow_query_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.upstream.page_size, 100);
        assert_eq!(settings.upstream.max_retries, 5);
        assert_eq!(settings.search.default_limit, 10);
        assert_eq!(settings.search.max_limit, 100);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "server:\n  port: 9000\nupstream:\n  max_retries: 3\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.upstream.max_retries, 3);
        assert_eq!(settings.upstream.page_size, 100);
        assert_eq!(settings.search.slow_query_ms, 100);
    }

    #[test]
    fn test_base_delay() {
        let upstream = UpstreamSettings::default();
        assert_eq!(upstream.base_delay(), Duration::from_millis(500));
    }
}
