use async_trait::async_trait;
use tuidict_types::{Language, Query};

/// Input rejected before any search is issued
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty input")]
    Empty,

    #[error("wrong format of input: {0}")]
    WrongFormat(String),
}

/// Normalization failed; ends the current query only
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("normalization service failed: {0}")]
    Transport(String),

    #[error("nothing left to search after normalization")]
    Empty,
}

/// Per-language input validation and canonicalization
#[async_trait]
pub trait Normalizer: Send + Sync {
    fn language(&self) -> Language;

    /// Cheap synchronous check run by the session on submit
    fn validate(&self, raw: &str) -> Result<(), ValidationError>;

    /// Produce the canonical key used for cache and providers
    async fn normalize(&self, raw: &str) -> Result<String, NormalizeError>;

    async fn query(&self, raw: &str) -> Result<Query, NormalizeError> {
        let key = self.normalize(raw).await?;
        if key.is_empty() {
            return Err(NormalizeError::Empty);
        }
        Ok(Query::new(raw, key, self.language()))
    }
}

/// Optional trait for languages with inflection
pub trait Lemmatizer: Send + Sync {
    /// Candidate dictionary forms, best first. Empty when the word is already a lemma.
    fn lemmatize(&self, word: &str) -> Vec<LemmaCandidate>;

    /// Best dictionary form, falling back to the word itself
    fn lemma(&self, word: &str) -> String {
        self.lemmatize(word)
            .into_iter()
            .next()
            .map(|c| c.base_form)
            .unwrap_or_else(|| word.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LemmaCandidate {
    pub base_form: String,
    /// Name of the rule that produced this form, e.g. "irregular" or "-ies"
    pub rule: &'static str,
    pub confidence: f32,
}
