//! Types shared by all torrent providers.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::http::HttpError;

/// Structured reference to the media being searched for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    /// Canonical English title, preferred over the free-text query when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_title: Option<String>,
}

/// Search input, shared by plain and smart search.
///
/// The filter fields are ignored by plain search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text query.
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,
    /// Only batch releases.
    #[serde(default)]
    pub batch: bool,
    /// Episode number; `<= 0` means unspecified.
    #[serde(default)]
    pub episode_number: i32,
    /// Resolution such as "1080p"; empty means unspecified.
    #[serde(default)]
    pub resolution: String,
    /// Only source-asserted best releases.
    #[serde(default)]
    pub best_releases: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// The media's English title when present and non-empty, else the raw query.
    pub fn effective_query(&self) -> &str {
        self.media
            .as_ref()
            .and_then(|m| m.english_title.as_deref())
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.query)
    }
}

/// Smart-search filters a provider may advertise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SmartSearchFilter {
    Batch,
    EpisodeNumber,
    Resolution,
    Query,
    BestReleases,
}

/// Role a provider plays for the host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderRole {
    /// Primary provider.
    Main,
    /// Alternative provider, used alongside a main one.
    Special,
}

/// Static capability descriptor of a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub can_smart_search: bool,
    pub smart_search_filters: Vec<SmartSearchFilter>,
    pub supports_adult: bool,
    #[serde(rename = "type")]
    pub role: ProviderRole,
}

/// Normalized torrent record produced by every provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnimeTorrent {
    pub name: String,
    /// Publish time, serialized as ISO 8601 with milliseconds.
    #[serde(
        default,
        serialize_with = "serialize_iso_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    /// Size in bytes, 0 when unknown.
    pub size: u64,
    pub formatted_size: String,
    pub seeders: u32,
    pub leechers: u32,
    pub download_count: u64,
    pub link: String,
    pub download_url: String,
    pub magnet_link: String,
    pub info_hash: String,
    pub resolution: String,
    pub is_batch: bool,
    /// -1 when not a single episode or unknown.
    pub episode_number: i32,
    pub release_group: String,
    pub is_best_release: bool,
    /// True only when the source verifies the content itself.
    pub confirmed: bool,
}

impl Default for AnimeTorrent {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: None,
            size: 0,
            formatted_size: String::new(),
            seeders: 0,
            leechers: 0,
            download_count: 0,
            link: String::new(),
            download_url: String::new(),
            magnet_link: String::new(),
            info_hash: String::new(),
            resolution: String::new(),
            is_batch: false,
            episode_number: -1,
            release_group: String::new(),
            is_best_release: false,
            confirmed: false,
        }
    }
}

fn serialize_iso_millis<S: Serializer>(
    date: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.serialize_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

/// Build a magnet URI from a bare info-hash.
pub fn magnet_link(info_hash: &str) -> String {
    format!("magnet:?xt=urn:btih:{}", info_hash)
}

/// How a multi-source upstream's response body is parsed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// RSS feed with `nyaa:` namespaced item fields.
    XmlFeed,
    /// JSON array search API.
    JsonApi,
}

/// Why a single upstream fetch produced no results.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport failure: {0}")]
    Transport(#[from] HttpError),

    #[error("Upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// A failed upstream, reported next to the results of the others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Best-effort result of one provider call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchOutcome {
    pub torrents: Vec<AnimeTorrent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_errors: Vec<SourceFailure>,
}

impl SearchOutcome {
    /// Record a failed source; its results contribute nothing.
    pub fn push_failure(&mut self, source: &str, error: &FetchError) {
        self.source_errors.push(SourceFailure {
            source: source.to_string(),
            error: error.to_string(),
        });
    }
}

/// Errors returned by provider operations themselves (not by upstreams).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider {provider} does not support {operation}")]
    Unsupported {
        provider: String,
        operation: &'static str,
    },

    #[error("Provider not found: {0}")]
    NotFound(String),

    #[error("Provider already registered: {0}")]
    AlreadyRegistered(String),
}

/// A pluggable source of anime torrent search results.
#[async_trait]
pub trait TorrentProvider: Send + Sync {
    /// Provider name for registration and logging.
    fn name(&self) -> &str;

    /// Static capability descriptor.
    fn settings(&self) -> ProviderSettings;

    /// Plain free-text search. Upstream failures never surface as errors.
    async fn search(&self, request: &SearchRequest) -> SearchOutcome;

    /// Search with structured filters.
    async fn smart_search(&self, _request: &SearchRequest) -> Result<SearchOutcome, ProviderError> {
        Err(ProviderError::Unsupported {
            provider: self.name().to_string(),
            operation: "smart_search",
        })
    }

    /// Most recent releases, without a query.
    async fn latest(&self) -> Result<SearchOutcome, ProviderError> {
        Err(ProviderError::Unsupported {
            provider: self.name().to_string(),
            operation: "latest",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_query_prefers_english_title() {
        let mut request = SearchRequest::new("shingeki no kyojin");
        assert_eq!(request.effective_query(), "shingeki no kyojin");

        request.media = Some(MediaRef {
            english_title: Some("Attack on Titan".to_string()),
        });
        assert_eq!(request.effective_query(), "Attack on Titan");
    }

    #[test]
    fn test_effective_query_ignores_empty_title() {
        let request = SearchRequest {
            media: Some(MediaRef {
                english_title: Some(String::new()),
            }),
            ..SearchRequest::new("frieren")
        };
        assert_eq!(request.effective_query(), "frieren");
    }

    #[test]
    fn test_search_request_minimal_json() {
        let parsed: SearchRequest = serde_json::from_str(r#"{"query": "minimal"}"#).unwrap();
        assert_eq!(parsed.query, "minimal");
        assert!(parsed.media.is_none());
        assert!(!parsed.batch);
        assert_eq!(parsed.episode_number, 0);
        assert!(parsed.resolution.is_empty());
    }

    #[test]
    fn test_search_request_camel_case() {
        let json = r#"{
            "query": "x",
            "episodeNumber": 3,
            "bestReleases": true,
            "media": {"englishTitle": "X"}
        }"#;
        let parsed: SearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.episode_number, 3);
        assert!(parsed.best_releases);
        assert_eq!(parsed.effective_query(), "X");
    }

    #[test]
    fn test_settings_serialization() {
        let settings = ProviderSettings {
            can_smart_search: true,
            smart_search_filters: vec![
                SmartSearchFilter::EpisodeNumber,
                SmartSearchFilter::BestReleases,
            ],
            supports_adult: false,
            role: ProviderRole::Main,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["canSmartSearch"], true);
        assert_eq!(json["smartSearchFilters"][0], "episodeNumber");
        assert_eq!(json["smartSearchFilters"][1], "bestReleases");
        assert_eq!(json["type"], "main");
    }

    #[test]
    fn test_torrent_date_serialized_with_millis() {
        let torrent = AnimeTorrent {
            name: "X".to_string(),
            date: DateTime::from_timestamp_millis(1_700_000_000_000),
            ..AnimeTorrent::default()
        };
        let json = serde_json::to_value(&torrent).unwrap();
        assert_eq!(json["date"], "2023-11-14T22:13:20.000Z");
        assert_eq!(json["episodeNumber"], -1);
        assert_eq!(json["formattedSize"], "");

        let parsed: AnimeTorrent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, torrent);
    }

    #[test]
    fn test_torrent_without_date_omits_field() {
        let json = serde_json::to_value(AnimeTorrent::default()).unwrap();
        assert!(json.get("date").is_none());
    }

    #[test]
    fn test_magnet_link() {
        assert_eq!(magnet_link("abc123"), "magnet:?xt=urn:btih:abc123");
    }

    #[test]
    fn test_outcome_skips_empty_errors() {
        let json = serde_json::to_string(&SearchOutcome::default()).unwrap();
        assert!(!json.contains("source_errors"));

        let mut outcome = SearchOutcome::default();
        outcome.push_failure("nyaa", &FetchError::Decode("bad".to_string()));
        assert_eq!(outcome.source_errors[0].source, "nyaa");
        assert!(outcome.source_errors[0].error.contains("bad"));
    }
}
