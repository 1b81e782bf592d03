//! Mock HTTP client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::http::{HttpClient, HttpError, HttpResponse};

/// What a matching route produces.
#[derive(Debug, Clone)]
enum MockReply {
    Respond(HttpResponse),
    Fail(HttpError),
}

/// Mock implementation of the HttpClient trait.
///
/// Routes are matched by URL prefix; the longest matching prefix wins.
/// Unmatched URLs get a 404 response.
///
/// # Example
///
/// ```rust,ignore
/// use anitorrent_core::testing::MockHttpClient;
///
/// let client = MockHttpClient::new();
/// client.respond("https://nyaa.si/", HttpResponse::new(200, feed_xml)).await;
/// client.fail("https://apibay.org/", HttpError::Timeout).await;
///
/// // ... run a provider against it ...
///
/// let urls = client.requested_urls().await;
/// assert_eq!(urls.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockHttpClient {
    /// Configured routes (URL prefix -> reply).
    routes: Arc<RwLock<Vec<(String, MockReply)>>>,
    /// Every URL requested, in order.
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockHttpClient {
    /// Create a new mock client with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs starting with `prefix` with `response`.
    pub async fn respond(&self, prefix: &str, response: HttpResponse) {
        self.set_route(prefix, MockReply::Respond(response)).await;
    }

    /// Fail URLs starting with `prefix` with a transport error.
    pub async fn fail(&self, prefix: &str, error: HttpError) {
        self.set_route(prefix, MockReply::Fail(error)).await;
    }

    /// Remove all routes.
    pub async fn clear_routes(&self) {
        self.routes.write().await.clear();
    }

    /// Get the requested URLs.
    pub async fn requested_urls(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    /// Get the number of requests made.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    async fn set_route(&self, prefix: &str, reply: MockReply) {
        let mut routes = self.routes.write().await;
        routes.retain(|(p, _)| p != prefix);
        routes.push((prefix.to_string(), reply));
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requests.write().await.push(url.to_string());

        let routes = self.routes.read().await;
        let reply = routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Fail(error)) => Err(error),
            None => Ok(HttpResponse::new(404, "Not Found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client
            .respond("http://x.test/", HttpResponse::new(200, "short"))
            .await;
        client
            .respond(
                "http://x.test/torrents?latest",
                HttpResponse::new(200, "long"),
            )
            .await;

        let latest = client.get("http://x.test/torrents?latest=1").await.unwrap();
        assert_eq!(latest.body, "long");

        let other = client.get("http://x.test/torrents?query=a").await.unwrap();
        assert_eq!(other.body, "short");
    }

    #[tokio::test]
    async fn test_unmatched_is_404() {
        let client = MockHttpClient::new();
        let response = client.get("http://nowhere.test/").await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_failure_injection_and_recording() {
        let client = MockHttpClient::new();
        client.fail("http://down.test/", HttpError::Timeout).await;

        assert!(client.get("http://down.test/a").await.is_err());
        assert!(client.get("http://down.test/b").await.is_err());

        assert_eq!(client.request_count().await, 2);
        assert_eq!(
            client.requested_urls().await,
            vec!["http://down.test/a", "http://down.test/b"]
        );
    }

    #[tokio::test]
    async fn test_route_replacement() {
        let client = MockHttpClient::new();
        client.fail("http://x.test/", HttpError::Timeout).await;
        client
            .respond("http://x.test/", HttpResponse::new(200, "ok"))
            .await;
        assert!(client.get("http://x.test/").await.is_ok());

        client.clear_routes().await;
        assert_eq!(client.get("http://x.test/").await.unwrap().status, 404);
    }
}
