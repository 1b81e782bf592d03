use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Aggregator base URL is an http(s) URL
/// - Multi-source list is non-empty with unique, named, http(s) sources
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(aggregator) = config.aggregator.as_ref().filter(|a| a.enabled) {
        if !is_http_url(&aggregator.base_url) {
            return Err(ConfigError::ValidationError(format!(
                "aggregator.base_url must be an http(s) URL, got {:?}",
                aggregator.base_url
            )));
        }
    }

    if let Some(multi) = config.multi_source.as_ref().filter(|m| m.enabled) {
        if multi.sources.is_empty() {
            return Err(ConfigError::ValidationError(
                "multi_source.sources cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &multi.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "multi_source source name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate multi_source source name: {}",
                    source.name
                )));
            }
            if !is_http_url(&source.endpoint) {
                return Err(ConfigError::ValidationError(format!(
                    "source {} endpoint must be an http(s) URL",
                    source.name
                )));
            }
        }
    }

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AggregatorConfig, ServerConfig, SourceConfig};
    use crate::provider::SourceKind;
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_aggregator_url_fails() {
        let config = Config {
            aggregator: Some(AggregatorConfig {
                enabled: true,
                base_url: String::new(),
            }),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_disabled_aggregator_is_not_checked() {
        let config = Config {
            aggregator: Some(AggregatorConfig {
                enabled: false,
                base_url: String::new(),
            }),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_duplicate_source_names_fail() {
        let mut config = Config::default();
        let source = SourceConfig {
            name: "dup".to_string(),
            endpoint: "https://example.org/?q=".to_string(),
            kind: SourceKind::XmlFeed,
            page_base_url: None,
        };
        config.multi_source.as_mut().unwrap().sources = vec![source.clone(), source];
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_validate_empty_sources_fail() {
        let mut config = Config::default();
        config.multi_source.as_mut().unwrap().sources.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_non_http_endpoint_fails() {
        let mut config = Config::default();
        config.multi_source.as_mut().unwrap().sources[0].endpoint = "ftp://nyaa.si/".to_string();
        assert!(validate_config(&config).is_err());
    }
}
