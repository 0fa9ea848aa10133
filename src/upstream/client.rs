//! HTTP client for the upstream message feed

use super::models::FeedPage;
use crate::config::UpstreamSettings;
use anyhow::Result;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors from a single page request
///
/// Every variant is transient from the loader's point of view and subject to
/// the same retry policy.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("failed to decode feed page: {0}")]
    Decode(String),
}

/// JSON-over-HTTP client for the paginated feed endpoint
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    feed_url: Url,
}

impl FeedClient {
    /// Create a client configured from upstream settings
    pub fn with_settings(settings: &UpstreamSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .gzip(true)
            .build()?;
        let feed_url = Url::parse(&settings.url)?;

        Ok(Self { client, feed_url })
    }

    /// Fetch one page of the feed at the given offset
    pub async fn fetch_page(&self, skip: u64, limit: u32) -> Result<FeedPage, FetchError> {
        let response = self
            .client
            .get(self.feed_url.clone())
            .query(&[("skip", skip.to_string()), ("limit", limit.to_string())])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<FeedPage>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer) -> UpstreamSettings {
        UpstreamSettings {
            url: format!("{}/messages", server.uri()),
            request_timeout: 5.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .and(query_param("skip", "0"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "items": [{
                    "id": "1",
                    "user_id": "u1",
                    "user_name": "alice",
                    "timestamp": "2024-01-01T00:00:00Z",
                    "message": "hello"
                }]
            })))
            .mount(&server)
            .await;

        let client = FeedClient::with_settings(&settings_for(&server)).unwrap();
        let page = client.fetch_page(0, 100).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].message, "hello");
    }

    #[tokio::test]
    async fn test_fetch_page_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = FeedClient::with_settings(&settings_for(&server)).unwrap();
        let err = client.fetch_page(0, 100).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
    }

    #[tokio::test]
    async fn test_fetch_page_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = FeedClient::with_settings(&settings_for(&server)).unwrap();
        let err = client.fetch_page(0, 100).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_rejects_invalid_url() {
        let settings = UpstreamSettings {
            url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(FeedClient::with_settings(&settings).is_err());
    }
}
