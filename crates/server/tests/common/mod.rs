//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! whose providers talk to a [`MockHttpClient`] instead of the network.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use anitorrent_core::{
    create_registry, testing::MockHttpClient, AggregatorConfig, Config, HttpClient, HttpConfig,
    MultiSourceConfig, ServerConfig, SourceConfig, SourceKind,
};

/// Re-export fixtures for test convenience
pub use anitorrent_core::testing::fixtures;

pub const AGGREGATOR_URL: &str = "http://aggregator.test";
pub const FEED_ENDPOINT: &str = "http://feed.test/?page=rss&q=";
pub const API_ENDPOINT: &str = "http://api.test/q.php?q=";

/// Test fixture with both providers backed by a mock HTTP client.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock upstreams - configure responses per URL prefix
    pub http: Arc<MockHttpClient>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let http = Arc::new(MockHttpClient::new());

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 8080, // Not used for in-process testing
            },
            http: HttpConfig::default(),
            aggregator: Some(AggregatorConfig {
                enabled: true,
                base_url: AGGREGATOR_URL.to_string(),
            }),
            multi_source: Some(MultiSourceConfig {
                enabled: true,
                sources: vec![
                    SourceConfig {
                        name: "feed".to_string(),
                        endpoint: FEED_ENDPOINT.to_string(),
                        kind: SourceKind::XmlFeed,
                        page_base_url: None,
                    },
                    SourceConfig {
                        name: "api".to_string(),
                        endpoint: API_ENDPOINT.to_string(),
                        kind: SourceKind::JsonApi,
                        page_base_url: Some("http://api.test/torrent/".to_string()),
                    },
                ],
            }),
        };

        let registry = create_registry(&config, Arc::clone(&http) as Arc<dyn HttpClient>)
            .expect("Failed to create registry");
        let state = Arc::new(anitorrent_server::state::AppState::new(config, registry));
        let router = anitorrent_server::api::create_router(state);

        Self { router, http }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
