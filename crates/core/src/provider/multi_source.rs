//! Multi-source provider: an RSS feed and a JSON search API queried in turn.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{MultiSourceConfig, SourceConfig};
use crate::http::HttpClient;

use super::lenient::{string_or_empty, string_or_number, u32_or_zero, u64_or_zero};
use super::rss::{parse_feed, FeedItem};
use super::size::{format_megabytes, parse_binary_size};
use super::{
    magnet_link, AnimeTorrent, FetchError, ProviderRole, ProviderSettings, SearchOutcome,
    SearchRequest, SourceKind, TorrentProvider,
};

/// Registered name of the multi-source provider.
pub const MULTI_SOURCE_PROVIDER_NAME: &str = "multi-source";

/// Page link prefix for JSON API sources that do not configure one.
const DEFAULT_PAGE_BASE_URL: &str = "https://pirateproxy.live/torrent/";

/// Term appended to feed queries to keep batch releases out.
const FEED_BATCH_EXCLUSION: &str = " -batch";

/// Provider that merges results from several public indexers.
pub struct MultiSourceProvider {
    client: Arc<dyn HttpClient>,
    sources: Vec<SourceConfig>,
}

impl MultiSourceProvider {
    pub fn new(config: MultiSourceConfig, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            sources: config.sources,
        }
    }

    /// Query one source and map its results.
    async fn fetch_source(
        &self,
        source: &SourceConfig,
        query: &str,
    ) -> Result<Vec<AnimeTorrent>, FetchError> {
        let url = source_url(source, query);
        debug!(source = %source.name, url = %url, "Fetching source");

        let response = self.client.get(&url).await?;

        if !response.is_success() {
            return Err(FetchError::UpstreamStatus {
                status: response.status,
                body: response.body.chars().take(200).collect(),
            });
        }

        let torrents = match source.kind {
            SourceKind::XmlFeed => parse_feed(&response.body)?
                .into_iter()
                .filter(|item| is_title_relevant(&item.title, query))
                .map(feed_item_to_torrent)
                .collect(),
            SourceKind::JsonApi => {
                let entries: Vec<ApiEntry> = response
                    .json()
                    .map_err(|e| FetchError::Decode(e.to_string()))?;
                let page_base = source
                    .page_base_url
                    .as_deref()
                    .unwrap_or(DEFAULT_PAGE_BASE_URL);
                let query_lower = query.to_lowercase();

                entries
                    .into_iter()
                    .filter(|e| e.name.to_lowercase().contains(&query_lower))
                    .map(|e| api_entry_to_torrent(e, page_base))
                    .collect()
            }
        };

        Ok(torrents)
    }
}

#[async_trait]
impl TorrentProvider for MultiSourceProvider {
    fn name(&self) -> &str {
        MULTI_SOURCE_PROVIDER_NAME
    }

    fn settings(&self) -> ProviderSettings {
        ProviderSettings {
            can_smart_search: false,
            smart_search_filters: Vec::new(),
            supports_adult: false,
            role: ProviderRole::Special,
        }
    }

    async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        let query = request.effective_query();
        let mut outcome = SearchOutcome::default();

        for source in &self.sources {
            match self.fetch_source(source, query).await {
                Ok(mut torrents) => {
                    debug!(
                        source = %source.name,
                        results = torrents.len(),
                        "Source search complete"
                    );
                    outcome.torrents.append(&mut torrents);
                }
                Err(e) => {
                    warn!(source = %source.name, error = %e, "Source search failed");
                    outcome.push_failure(&source.name, &e);
                }
            }
        }

        outcome
    }
}

/// Endpoint plus the encoded, source-adjusted query.
fn source_url(source: &SourceConfig, query: &str) -> String {
    let search_query = match source.kind {
        SourceKind::XmlFeed => format!("{}{}", query, FEED_BATCH_EXCLUSION),
        SourceKind::JsonApi => query.to_string(),
    };
    format!("{}{}", source.endpoint, urlencoding::encode(&search_query))
}

/// Lowercase and drop everything but ASCII letters and digits.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Substring check on normalized text; word order matters.
pub fn is_title_relevant(title: &str, query: &str) -> bool {
    normalize(title).contains(&normalize(query))
}

fn feed_item_to_torrent(item: FeedItem) -> AnimeTorrent {
    AnimeTorrent {
        is_batch: item.title.to_lowercase().contains("batch"),
        name: item.title,
        date: item.pub_date,
        size: parse_binary_size(&item.size),
        formatted_size: item.size,
        seeders: item.seeders,
        leechers: item.leechers,
        download_count: item.downloads,
        link: item.guid.unwrap_or_else(|| item.link.clone()),
        download_url: item.link,
        magnet_link: magnet_link(&item.info_hash),
        info_hash: item.info_hash,
        resolution: String::new(),
        episode_number: -1,
        release_group: String::new(),
        is_best_release: false,
        confirmed: false,
    }
}

/// JSON API wire record.
#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default, deserialize_with = "string_or_empty")]
    name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    info_hash: String,
    #[serde(default, deserialize_with = "u64_or_zero")]
    size: u64,
    #[serde(default, deserialize_with = "u32_or_zero")]
    seeders: u32,
    #[serde(default, deserialize_with = "u32_or_zero")]
    leechers: u32,
}

fn api_entry_to_torrent(entry: ApiEntry, page_base: &str) -> AnimeTorrent {
    let page_url = format!("{}{}", page_base, entry.id);
    let info_hash = entry.info_hash.to_lowercase();

    AnimeTorrent {
        name: entry.name,
        date: None,
        size: entry.size,
        formatted_size: format_megabytes(entry.size),
        seeders: entry.seeders,
        leechers: entry.leechers,
        download_count: 0,
        link: page_url.clone(),
        download_url: page_url,
        magnet_link: magnet_link(&info_hash),
        info_hash,
        resolution: String::new(),
        is_batch: false,
        episode_number: -1,
        release_group: String::new(),
        is_best_release: false,
        confirmed: false,
    }
}
