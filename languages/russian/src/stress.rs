use std::time::Duration;

use reqwest::Client;
use tuidict_core::language::NormalizeError;

/// Client for an external stress-annotation service.
///
/// The service takes a form field `text` and answers with the same text
/// in plain UTF-8, stress marks added.
pub struct StressClient {
    client: Client,
    url: String,
}

impl StressClient {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, url))
    }

    pub async fn annotate(&self, word: &str) -> Result<String, NormalizeError> {
        let transport = |e: reqwest::Error| NormalizeError::Transport(e.to_string());

        let body = self
            .client
            .post(&self.url)
            .form(&[("text", word)])
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .text()
            .await
            .map_err(transport)?;

        Ok(body.trim().to_string())
    }
}
