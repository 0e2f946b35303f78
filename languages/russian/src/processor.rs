use std::time::Duration;

use async_trait::async_trait;
use tuidict_config::russian::RussianConfig;
use tuidict_core::language::{NormalizeError, Normalizer, ValidationError};
use tuidict_core::preprocess::{ComposingPreprocessor, Preprocessor};
use tuidict_core::types::{Language, collapse_whitespace};
use unicode_normalization::UnicodeNormalization;

use crate::accent::{STRESS_MARK, is_cyrillic, strip_stress};
use crate::stress::StressClient;

pub struct RussianNormalizer {
    preprocessor: ComposingPreprocessor,
    stress: Option<StressClient>,
}

impl RussianNormalizer {
    /// Local-only normalization, no stress service
    pub fn new() -> Self {
        Self {
            preprocessor: ComposingPreprocessor,
            stress: None,
        }
    }

    pub fn with_stress(stress: StressClient) -> Self {
        Self {
            preprocessor: ComposingPreprocessor,
            stress: Some(stress),
        }
    }

    pub fn from_config(config: &RussianConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !config.stress_service_enabled {
            return Ok(Self::new());
        }
        tracing::info!(url = %config.stress_service_url, "using stress annotation service");
        let client = StressClient::with_timeout(config.stress_service_url.clone(), timeout)?;
        Ok(Self::with_stress(client))
    }
}

impl Default for RussianNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Normalizer for RussianNormalizer {
    fn language(&self) -> Language {
        Language::Russian
    }

    fn validate(&self, raw: &str) -> Result<(), ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        let valid = trimmed
            .nfc()
            .all(|c| is_cyrillic(c) || c.is_whitespace() || c == STRESS_MARK);
        if !valid {
            return Err(ValidationError::WrongFormat(trimmed.to_string()));
        }
        Ok(())
    }

    async fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let mut text = self.preprocessor.process(raw);

        if let Some(stress) = &self.stress {
            text = stress.annotate(&text).await?;
            tracing::debug!("stress service returned {text:?}");
        }

        let key = collapse_whitespace(&strip_stress(&text)).to_lowercase();
        if key.is_empty() {
            return Err(NormalizeError::Empty);
        }
        Ok(key)
    }
}
