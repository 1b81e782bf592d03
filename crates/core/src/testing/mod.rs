//! Testing utilities and mock implementations.
//!
//! This module provides a mock [`HttpClient`](crate::http::HttpClient) and
//! builders for upstream payloads, so providers can be exercised without
//! network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use anitorrent_core::testing::{fixtures, MockHttpClient};
//!
//! let client = Arc::new(MockHttpClient::new());
//! client.respond("https://nyaa.si/", HttpResponse::new(200, fixtures::rss_feed(&[
//!     fixtures::rss_item("[Group] Show - 01", "abc123", "1.4 GiB", 10, 2),
//! ]))).await;
//! ```

mod mock_http_client;

pub use mock_http_client::MockHttpClient;

/// Upstream payload builders.
pub mod fixtures {
    use serde_json::{json, Value};

    /// One aggregator API record with reasonable defaults.
    pub fn aggregator_record(title: &str, info_hash: &str, episode: i64) -> Value {
        json!({
            "title": title,
            "timestamp": 1_700_000_000,
            "size": 1024 * 1024 * 350,
            "seeders": 120,
            "leechers": 8,
            "downloads": 5000,
            "pageUrl": format!("https://aggregator.test/view/{}", info_hash),
            "downloadUrl": format!("https://aggregator.test/download/{}.torrent", info_hash),
            "magnet": format!("magnet:?xt=urn:btih:{}", info_hash),
            "infoHash": info_hash,
            "resolution": "1080p",
            "isBatch": false,
            "episode": episode,
            "group": "SubsPlease",
            "isBest": false,
        })
    }

    /// JSON array body from records.
    pub fn aggregator_results(records: &[Value]) -> String {
        Value::Array(records.to_vec()).to_string()
    }

    /// One Nyaa-style RSS `<item>`.
    pub fn rss_item(
        title: &str,
        info_hash: &str,
        size: &str,
        seeders: u32,
        leechers: u32,
    ) -> String {
        format!(
            r#"<item>
      <title>{title}</title>
      <link>https://nyaa.test/download/{info_hash}.torrent</link>
      <guid isPermaLink="true">https://nyaa.test/view/{info_hash}</guid>
      <pubDate>Tue, 14 Nov 2023 22:13:20 -0000</pubDate>
      <nyaa:seeders>{seeders}</nyaa:seeders>
      <nyaa:leechers>{leechers}</nyaa:leechers>
      <nyaa:downloads>100</nyaa:downloads>
      <nyaa:infoHash>{info_hash}</nyaa:infoHash>
      <nyaa:size>{size}</nyaa:size>
    </item>"#
        )
    }

    /// Full RSS document wrapping the given items.
    pub fn rss_feed(items: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss xmlns:atom="http://www.w3.org/2005/Atom" xmlns:nyaa="https://nyaa.si/xmlns/nyaa" version="2.0">
  <channel>
    <title>Nyaa - Torrent File RSS</title>
    <link>https://nyaa.test/</link>
    {}
  </channel>
</rss>"#,
            items.join("\n    ")
        )
    }

    /// One JSON search API entry, numbers encoded as strings.
    pub fn api_entry(id: &str, name: &str, info_hash: &str, size: u64) -> Value {
        json!({
            "id": id,
            "name": name,
            "info_hash": info_hash,
            "leechers": "1",
            "seeders": "5",
            "num_files": "1",
            "size": size.to_string(),
            "username": "uploader",
            "added": "1700000000",
            "status": "member",
            "category": "208",
        })
    }

    /// JSON array body from API entries.
    pub fn api_results(entries: &[Value]) -> String {
        Value::Array(entries.to_vec()).to_string()
    }
}
