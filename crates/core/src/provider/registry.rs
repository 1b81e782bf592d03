//! Name-keyed registry of providers.

use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::http::HttpClient;

use super::{
    AggregatorProvider, MultiSourceProvider, ProviderError, ProviderSettings, TorrentProvider,
};

/// Providers available to the host, in registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn TorrentProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its own name.
    pub fn register(&mut self, provider: Arc<dyn TorrentProvider>) -> Result<(), ProviderError> {
        if self.get(provider.name()).is_some() {
            return Err(ProviderError::AlreadyRegistered(provider.name().to_string()));
        }
        info!(provider = provider.name(), "Registered provider");
        self.providers.push(provider);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TorrentProvider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    /// Like [`get`](Self::get), but a missing provider is an error.
    pub fn require(&self, name: &str) -> Result<Arc<dyn TorrentProvider>, ProviderError> {
        self.get(name)
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Every provider's capability descriptor, keyed by name.
    pub fn settings(&self) -> Vec<(String, ProviderSettings)> {
        self.providers
            .iter()
            .map(|p| (p.name().to_string(), p.settings()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Build a registry holding every provider enabled in `config`.
pub fn create_registry(
    config: &Config,
    client: Arc<dyn HttpClient>,
) -> Result<ProviderRegistry, ProviderError> {
    let mut registry = ProviderRegistry::new();

    if let Some(aggregator) = config.aggregator.as_ref().filter(|a| a.enabled) {
        registry.register(Arc::new(AggregatorProvider::new(
            aggregator.clone(),
            Arc::clone(&client),
        )))?;
    }

    if let Some(multi) = config.multi_source.as_ref().filter(|m| m.enabled) {
        registry.register(Arc::new(MultiSourceProvider::new(
            multi.clone(),
            Arc::clone(&client),
        )))?;
    }

    Ok(registry)
}
