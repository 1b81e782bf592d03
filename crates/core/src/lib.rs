pub mod config;
pub mod http;
pub mod provider;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, AggregatorConfig, Config, ConfigError,
    HttpConfig, MultiSourceConfig, SanitizedConfig, ServerConfig, SourceConfig,
};
pub use http::{HttpClient, HttpError, HttpResponse, ReqwestHttpClient};
pub use provider::{
    create_registry, AggregatorProvider, AnimeTorrent, FetchError, MediaRef, MultiSourceProvider,
    ProviderError, ProviderRegistry, ProviderRole, ProviderSettings, SearchOutcome, SearchRequest,
    SmartSearchFilter, SourceFailure, SourceKind, TorrentProvider,
};
