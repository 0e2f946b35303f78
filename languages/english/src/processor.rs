use async_trait::async_trait;
use regex::Regex;
use tuidict_core::language::{Lemmatizer, NormalizeError, Normalizer, ValidationError};
use tuidict_core::preprocess::{DefaultPreprocessor, Preprocessor};
use tuidict_core::types::Language;

use crate::lemmatizer::EnglishLemmatizer;

/// English input handling: letters and spaces only, lemmatized single words
pub struct EnglishNormalizer {
    pattern: Regex,
    preprocessor: DefaultPreprocessor,
    lemmatizer: EnglishLemmatizer,
}

impl EnglishNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"^[a-zA-Z\s]+$")?,
            preprocessor: DefaultPreprocessor,
            lemmatizer: EnglishLemmatizer::new(),
        })
    }

    /// Canonical form without the async wrapper
    pub fn canonicalize(&self, raw: &str) -> String {
        let text = self.preprocessor.process(raw);

        if text.contains(' ') {
            return text;
        }

        let lemma = self.lemmatizer.lemma(&text);
        if lemma != text {
            tracing::debug!("lemmatized {text:?} to {lemma:?}");
        }
        lemma
    }
}

#[async_trait]
impl Normalizer for EnglishNormalizer {
    fn language(&self) -> Language {
        Language::English
    }

    fn validate(&self, raw: &str) -> Result<(), ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }
        if !self.pattern.is_match(trimmed) {
            return Err(ValidationError::WrongFormat(trimmed.to_string()));
        }
        Ok(())
    }

    async fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
        let key = self.canonicalize(raw);
        if key.is_empty() {
            return Err(NormalizeError::Empty);
        }
        Ok(key)
    }
}
