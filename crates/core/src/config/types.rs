use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::provider::SourceKind;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Absent section means enabled with defaults; set `enabled = false` to opt out
    #[serde(default = "default_aggregator_section")]
    pub aggregator: Option<AggregatorConfig>,
    #[serde(default = "default_multi_source_section")]
    pub multi_source: Option<MultiSourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            aggregator: Some(AggregatorConfig::default()),
            multi_source: Some(MultiSourceConfig::default()),
        }
    }
}

fn default_aggregator_section() -> Option<AggregatorConfig> {
    Some(AggregatorConfig::default())
}

fn default_multi_source_section() -> Option<MultiSourceConfig> {
    Some(MultiSourceConfig::default())
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Outbound HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// User-Agent header sent to every upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("anitorrent/{}", env!("CARGO_PKG_VERSION"))
}

fn default_enabled() -> bool {
    true
}

/// Aggregator provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AggregatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// API base URL; `/torrents` is appended to it
    #[serde(default = "default_aggregator_url")]
    pub base_url: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_aggregator_url(),
        }
    }
}

fn default_aggregator_url() -> String {
    "https://torrentio-api.example.com".to_string()
}

/// Multi-source provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MultiSourceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Sources queried in order
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for MultiSourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sources: default_sources(),
        }
    }
}

/// A single upstream queried by the multi-source provider
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SourceConfig {
    /// Name used in logs and error reports
    pub name: String,
    /// Endpoint prefix; the encoded query is appended verbatim
    pub endpoint: String,
    /// Which parser handles the response body
    pub kind: SourceKind,
    /// Prefix for synthesized page links (json_api sources only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_base_url: Option<String>,
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "nyaa".to_string(),
            endpoint: "https://nyaa.si/?page=rss&c=1_2&q=".to_string(),
            kind: SourceKind::XmlFeed,
            page_base_url: None,
        },
        SourceConfig {
            name: "apibay".to_string(),
            endpoint: "https://apibay.org/q.php?q=".to_string(),
            kind: SourceKind::JsonApi,
            page_base_url: Some("https://pirateproxy.live/torrent/".to_string()),
        },
    ]
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub http_timeout_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<SanitizedAggregatorConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SanitizedSourceConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAggregatorConfig {
    pub enabled: bool,
    pub base_url: String,
}

/// Source descriptor without endpoint query strings
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub host: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            http_timeout_secs: config.http.timeout_secs,
            aggregator: config
                .aggregator
                .as_ref()
                .map(|a| SanitizedAggregatorConfig {
                    enabled: a.enabled,
                    base_url: a.base_url.clone(),
                }),
            sources: config
                .multi_source
                .as_ref()
                .filter(|m| m.enabled)
                .map(|m| {
                    m.sources
                        .iter()
                        .map(|s| SanitizedSourceConfig {
                            name: s.name.clone(),
                            kind: s.kind,
                            host: endpoint_host(&s.endpoint).to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Host part of an endpoint URL, without scheme, path or query.
fn endpoint_host(endpoint: &str) -> &str {
    let rest = endpoint
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(endpoint);
    rest.split(['/', '?']).next().unwrap_or(rest)
}
