//! Aggregator provider: a single JSON API with smart-search filters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AggregatorConfig;
use crate::http::HttpClient;

use super::lenient::{bool_or_false, optional_i64, optional_string, u32_or_zero, u64_or_zero};
use super::{
    AnimeTorrent, FetchError, ProviderError, ProviderRole, ProviderSettings, SearchOutcome,
    SearchRequest, SmartSearchFilter, TorrentProvider,
};

/// Registered name of the aggregator provider.
pub const AGGREGATOR_PROVIDER_NAME: &str = "aggregator";

/// Provider backed by one authoritative JSON aggregator API.
pub struct AggregatorProvider {
    client: Arc<dyn HttpClient>,
    base_url: String,
}

impl AggregatorProvider {
    pub fn new(config: AggregatorConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL for a `/torrents` query string (including the leading `?`).
    fn torrents_url(&self, query_string: &str) -> String {
        format!("{}/torrents{}", self.base_url, query_string)
    }

    /// GET `/torrents<query_string>` and decode the raw records.
    async fn fetch_torrents(&self, query_string: &str) -> Result<Vec<RawTorrent>, FetchError> {
        let url = self.torrents_url(query_string);
        debug!(url = %url, "Fetching aggregator torrents");

        let response = self.client.get(&url).await?;

        if !response.is_success() {
            return Err(FetchError::UpstreamStatus {
                status: response.status,
                body: response.body.chars().take(200).collect(),
            });
        }

        response
            .json::<Vec<RawTorrent>>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Fetch and map, turning any failure into an empty, annotated outcome.
    async fn run(&self, query_string: &str) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        match self.fetch_torrents(query_string).await {
            Ok(raw) => {
                debug!(results = raw.len(), "Aggregator fetch complete");
                outcome.torrents = raw.into_iter().map(to_anime_torrent).collect();
            }
            Err(e) => {
                warn!(source = AGGREGATOR_PROVIDER_NAME, error = %e, "Error fetching torrents");
                outcome.push_failure(AGGREGATOR_PROVIDER_NAME, &e);
            }
        }

        outcome
    }
}

#[async_trait]
impl TorrentProvider for AggregatorProvider {
    fn name(&self) -> &str {
        AGGREGATOR_PROVIDER_NAME
    }

    fn settings(&self) -> ProviderSettings {
        ProviderSettings {
            can_smart_search: true,
            smart_search_filters: vec![
                SmartSearchFilter::Batch,
                SmartSearchFilter::EpisodeNumber,
                SmartSearchFilter::Resolution,
                SmartSearchFilter::Query,
                SmartSearchFilter::BestReleases,
            ],
            supports_adult: false,
            role: ProviderRole::Main,
        }
    }

    async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        self.run(&search_query_string(&request.query)).await
    }

    async fn smart_search(&self, request: &SearchRequest) -> Result<SearchOutcome, ProviderError> {
        Ok(self.run(&smart_search_query_string(request)).await)
    }

    async fn latest(&self) -> Result<SearchOutcome, ProviderError> {
        Ok(self.run(LATEST_QUERY_STRING).await)
    }
}

const LATEST_QUERY_STRING: &str = "?latest=1";

fn search_query_string(query: &str) -> String {
    format!("?query={}", urlencoding::encode(query))
}

fn smart_search_query_string(request: &SearchRequest) -> String {
    format!(
        "{}&filters={}",
        search_query_string(&request.query),
        build_filters(request)
    )
}

/// Comma-joined filter tokens, always in the order batch, episode, resolution, best.
fn build_filters(request: &SearchRequest) -> String {
    let mut filters = Vec::new();

    if request.batch {
        filters.push("batch".to_string());
    }
    if request.episode_number > 0 {
        filters.push(format!("episode-{}", request.episode_number));
    }
    if !request.resolution.is_empty() {
        filters.push(format!(
            "resolution-{}",
            urlencoding::encode(&request.resolution)
        ));
    }
    if request.best_releases {
        filters.push("best".to_string());
    }

    filters.join(",")
}

/// Aggregator wire record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTorrent {
    #[serde(default, deserialize_with = "optional_string")]
    title: Option<String>,
    /// Unix seconds.
    #[serde(default, deserialize_with = "optional_i64")]
    timestamp: Option<i64>,
    #[serde(default, deserialize_with = "u64_or_zero")]
    size: u64,
    #[serde(default, deserialize_with = "u32_or_zero")]
    seeders: u32,
    #[serde(default, deserialize_with = "u32_or_zero")]
    leechers: u32,
    #[serde(default, deserialize_with = "u64_or_zero")]
    downloads: u64,
    #[serde(default, deserialize_with = "optional_string")]
    page_url: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    download_url: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    magnet: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    info_hash: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    resolution: Option<String>,
    #[serde(default, deserialize_with = "bool_or_false")]
    is_batch: bool,
    #[serde(default, deserialize_with = "optional_i64")]
    episode: Option<i64>,
    #[serde(default, deserialize_with = "optional_string")]
    group: Option<String>,
    #[serde(default, deserialize_with = "bool_or_false")]
    is_best: bool,
}

fn to_anime_torrent(raw: RawTorrent) -> AnimeTorrent {
    AnimeTorrent {
        name: raw.title.unwrap_or_default(),
        date: raw
            .timestamp
            .and_then(|secs| secs.checked_mul(1000))
            .and_then(DateTime::from_timestamp_millis),
        size: raw.size,
        formatted_size: String::new(),
        seeders: raw.seeders,
        leechers: raw.leechers,
        download_count: raw.downloads,
        link: raw.page_url.unwrap_or_default(),
        download_url: raw.download_url.unwrap_or_default(),
        magnet_link: raw.magnet.unwrap_or_default(),
        info_hash: raw.info_hash.unwrap_or_default().to_lowercase(),
        resolution: raw.resolution.unwrap_or_default(),
        is_batch: raw.is_batch,
        episode_number: match raw.episode {
            Some(n) if n != 0 => i32::try_from(n).unwrap_or(-1),
            _ => -1,
        },
        release_group: raw.group.unwrap_or_default(),
        is_best_release: raw.is_best,
        confirmed: true,
    }
}
