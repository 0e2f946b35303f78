use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tuidict_core::provider::{Provider, ProviderError};

use crate::{BuildError, parse_base_url, transport_error};

#[derive(Debug, Deserialize)]
struct DefineResponse {
    #[serde(default)]
    list: Vec<UrbanEntry>,
}

#[derive(Debug, Deserialize)]
struct UrbanEntry {
    #[serde(default)]
    definition: String,
}

pub struct UrbanProvider {
    client: Client,
    base: Url,
}

impl UrbanProvider {
    pub fn new(client: Client, base_url: &str) -> Result<Self, BuildError> {
        Ok(Self {
            client,
            base: parse_base_url(base_url)?,
        })
    }
}

/// Urban marks cross-references as `[word]`; keep the word, drop the brackets
pub fn strip_links(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '[' | ']')).collect()
}

pub fn parse_define(body: &str) -> Result<Vec<String>, ProviderError> {
    let response: DefineResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    if response.list.is_empty() {
        return Err(ProviderError::NoDefinition);
    }

    Ok(response
        .list
        .iter()
        .map(|entry| strip_links(&entry.definition))
        .collect())
}

#[async_trait]
impl Provider for UrbanProvider {
    fn name(&self) -> &str {
        "urban"
    }

    async fn search(&self, term: &str) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(self.base.clone())
            .query(&[("term", term)])
            .send()
            .await
            .map_err(transport_error)?
            .error_for_status()
            .map_err(transport_error)?;

        let body = response.text().await.map_err(transport_error)?;
        parse_define(&body)
    }
}
