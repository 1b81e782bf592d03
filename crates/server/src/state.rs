use anitorrent_core::{Config, ProviderRegistry, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    registry: ProviderRegistry,
}

impl AppState {
    pub fn new(config: Config, registry: ProviderRegistry) -> Self {
        Self { config, registry }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }
}
