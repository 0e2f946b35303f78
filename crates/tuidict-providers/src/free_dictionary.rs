use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tuidict_core::provider::{Provider, ProviderError};

use crate::{BuildError, parse_base_url, transport_error};

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(default)]
    definition: String,
}

/// dictionaryapi.dev entries endpoint, `GET {base}/{word}`
pub struct FreeDictionaryProvider {
    client: Client,
    base: Url,
}

impl FreeDictionaryProvider {
    pub fn new(client: Client, base_url: &str) -> Result<Self, BuildError> {
        let base = parse_base_url(base_url)?;
        if base.cannot_be_a_base() {
            return Err(BuildError::InvalidUrl {
                url: base_url.to_string(),
                reason: "cannot be a base".to_string(),
            });
        }
        Ok(Self { client, base })
    }

    fn url_for(&self, word: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }
}

/// Every `meanings[].definitions[].definition`, in document order
pub fn parse_entries(body: &str) -> Result<Vec<String>, ProviderError> {
    let entries: Vec<Entry> =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    Ok(entries
        .into_iter()
        .flat_map(|entry| entry.meanings)
        .flat_map(|meaning| meaning.definitions)
        .map(|sense| sense.definition)
        .collect())
}

#[async_trait]
impl Provider for FreeDictionaryProvider {
    fn name(&self) -> &str {
        "free-dictionary"
    }

    async fn search(&self, term: &str) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(self.url_for(term))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProviderError::NoDefinition),
            status if !status.is_success() => return Err(ProviderError::Http(status.as_u16())),
            _ => {}
        }

        let body = response.text().await.map_err(transport_error)?;
        parse_entries(&body)
    }
}
