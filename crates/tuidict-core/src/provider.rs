use std::time::Duration;

use async_trait::async_trait;
use tuidict_types::DefinitionList;

/// A single external definition source
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short stable name used in logs and error messages
    fn name(&self) -> &str;

    /// Look up a canonical term, returning raw definition strings in source order.
    ///
    /// Blank strings are allowed here; they are dropped when outcomes are merged.
    async fn search(&self, term: &str) -> Result<Vec<String>, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("no definition found")]
    NoDefinition,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Http(u16),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// What one provider contributed to one query
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    Success(DefinitionList),
    NoDefinition,
    TransportError(ProviderError),
}

impl ProviderOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ProviderOutcome::Success(_) => "success",
            ProviderOutcome::NoDefinition => "no-definition",
            ProviderOutcome::TransportError(_) => "transport-error",
        }
    }
}

impl From<Result<Vec<String>, ProviderError>> for ProviderOutcome {
    fn from(result: Result<Vec<String>, ProviderError>) -> Self {
        match result {
            Ok(raw) => match DefinitionList::from_raw(raw) {
                Some(list) => ProviderOutcome::Success(list),
                None => ProviderOutcome::NoDefinition,
            },
            Err(ProviderError::NoDefinition) => ProviderOutcome::NoDefinition,
            Err(e) => ProviderOutcome::TransportError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_blank_success_counts_as_no_definition() {
        let outcome = ProviderOutcome::from(Ok(vec![" ".to_string(), String::new()]));
        assert_eq!(outcome, ProviderOutcome::NoDefinition);
    }

    #[test]
    fn no_definition_error_is_not_a_transport_error() {
        let outcome = ProviderOutcome::from(Err(ProviderError::NoDefinition));
        assert_eq!(outcome, ProviderOutcome::NoDefinition);

        let outcome = ProviderOutcome::from(Err(ProviderError::Http(503)));
        assert_eq!(outcome, ProviderOutcome::TransportError(ProviderError::Http(503)));
    }
}
