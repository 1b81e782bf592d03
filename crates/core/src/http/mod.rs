//! Outbound HTTP capability used by the providers.
//!
//! Providers never talk to `reqwest` directly; they go through the
//! [`HttpClient`] trait so tests can substitute canned upstream responses.

mod reqwest_client;

pub use reqwest_client::ReqwestHttpClient;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Failures that prevented a response from being received at all.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(String),
}

/// Minimal GET-only HTTP client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch `url` and return the status and body as text.
    ///
    /// Non-2xx statuses are returned as `Ok`; only transport problems are errors.
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;
}
