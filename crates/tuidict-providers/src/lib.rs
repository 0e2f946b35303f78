use std::sync::Arc;
use std::time::Duration;

use tuidict_config::{Config, SourceConfig};
use tuidict_core::provider::{Provider, ProviderError};
use tuidict_core::types::Language;

pub mod dict_protocol;
pub mod free_dictionary;
pub mod urban;

pub use dict_protocol::DictProvider;
pub use free_dictionary::FreeDictionaryProvider;
pub use urban::UrbanProvider;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("invalid provider URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Shared HTTP client for every web provider
pub fn http_client(config: &Config) -> Result<reqwest::Client, BuildError> {
    let client = reqwest::Client::builder()
        .user_agent(config.network.user_agent.clone())
        .connect_timeout(Duration::from_millis(config.network.connect_timeout_ms))
        .build()?;
    Ok(client)
}

/// Instantiate the configured sources for `language`, in priority order
pub fn build_providers(
    config: &Config,
    language: Language,
) -> Result<Vec<Arc<dyn Provider>>, BuildError> {
    let sources = config.dictionary.sources_for(language);
    let needs_http = sources
        .iter()
        .any(|s| !matches!(s, SourceConfig::Dict { .. }));
    let client = if needs_http {
        Some(http_client(config)?)
    } else {
        None
    };

    let mut providers: Vec<Arc<dyn Provider>> = Vec::with_capacity(sources.len());
    for source in sources {
        let provider: Arc<dyn Provider> = match (source, &client) {
            (SourceConfig::FreeDictionary, Some(client)) => Arc::new(FreeDictionaryProvider::new(
                client.clone(),
                &config.dictionary.free_dictionary_url,
            )?),
            (SourceConfig::Urban, Some(client)) => {
                Arc::new(UrbanProvider::new(client.clone(), &config.dictionary.urban_url)?)
            }
            (SourceConfig::Dict { database }, _) => Arc::new(DictProvider::new(
                &config.dictionary.dict_server,
                database,
                Duration::from_millis(config.network.connect_timeout_ms),
            )),
            (_, None) => continue,
        };
        tracing::debug!(provider = provider.name(), %language, "provider configured");
        providers.push(provider);
    }

    if providers.is_empty() {
        tracing::warn!(%language, "no providers configured, every search will come back empty");
    }

    Ok(providers)
}

pub(crate) fn parse_base_url(url: &str) -> Result<reqwest::Url, BuildError> {
    reqwest::Url::parse(url).map_err(|e| BuildError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Classify a reqwest failure without losing the HTTP status
pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    if let Some(status) = e.status() {
        ProviderError::Http(status.as_u16())
    } else if e.is_decode() {
        ProviderError::Parse(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sources_in_configured_order() {
        let config = Config::default();
        let providers = build_providers(&config, Language::English).unwrap();
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["free-dictionary", "dict:wn", "urban"]);

        let providers = build_providers(&config, Language::Russian).unwrap();
        assert_eq!(providers[0].name(), "dict:fd-rus-eng");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = Config::default();
        config.dictionary.urban_url = "not a url".to_string();
        assert!(matches!(
            build_providers(&config, Language::English),
            Err(BuildError::InvalidUrl { .. })
        ));
    }
}
