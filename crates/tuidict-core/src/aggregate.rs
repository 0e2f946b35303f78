use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tuidict_types::{DefinitionList, ResultCap};

use crate::provider::{Provider, ProviderError, ProviderOutcome};

/// Merged result of one query across every configured provider
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult {
    Found(DefinitionList),
    NotFound,
    Failed(AggregateError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{provider}: {source}")]
pub struct AggregateError {
    pub provider: String,
    #[source]
    pub source: ProviderError,
}

/// Fans a query out to every provider and merges the outcomes in priority order
pub struct Aggregator {
    providers: Vec<Arc<dyn Provider>>,
    budget: Duration,
    cap: ResultCap,
}

impl Aggregator {
    /// `providers` order is the display priority, `budget` bounds each individual call
    pub fn new(providers: Vec<Arc<dyn Provider>>, budget: Duration) -> Self {
        Self {
            providers,
            budget,
            cap: ResultCap::Unbounded,
        }
    }

    pub fn with_cap(mut self, cap: ResultCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub async fn aggregate(&self, term: &str) -> AggregateResult {
        let outcomes = self.collect(term).await;
        merge(outcomes, self.cap)
    }

    /// Run every provider concurrently and return one outcome per provider,
    /// in configured order regardless of completion order.
    pub async fn collect(&self, term: &str) -> Vec<(String, ProviderOutcome)> {
        let mut tasks = JoinSet::new();

        for (index, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let term = term.to_string();
            let budget = self.budget;

            tasks.spawn(async move {
                let started = Instant::now();
                let outcome = match tokio::time::timeout(budget, provider.search(&term)).await {
                    Ok(result) => ProviderOutcome::from(result),
                    Err(_) => ProviderOutcome::TransportError(ProviderError::Timeout(budget)),
                };
                tracing::debug!(
                    provider = provider.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    outcome = outcome.label(),
                    "provider finished"
                );
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<ProviderOutcome>> = self.providers.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(e) => tracing::error!("provider task did not complete: {e}"),
            }
        }

        self.providers
            .iter()
            .zip(slots)
            .map(|(provider, slot)| {
                let outcome = slot.unwrap_or_else(|| {
                    ProviderOutcome::TransportError(ProviderError::Protocol(
                        "provider task aborted".to_string(),
                    ))
                });
                (provider.name().to_string(), outcome)
            })
            .collect()
    }
}

/// Merge per-provider outcomes, already in priority order, into one result.
///
/// Non-empty merge wins; otherwise the first transport error in priority
/// order is surfaced, and only an all-`NoDefinition` batch is `NotFound`.
pub fn merge(outcomes: Vec<(String, ProviderOutcome)>, cap: ResultCap) -> AggregateResult {
    let per_provider = match cap {
        ResultCap::PerProvider(n) => n.max(1),
        _ => usize::MAX,
    };

    let mut merged: Vec<String> = Vec::new();
    let mut first_error: Option<AggregateError> = None;

    for (provider, outcome) in outcomes {
        match outcome {
            ProviderOutcome::Success(list) => {
                merged.extend(list.into_inner().into_iter().take(per_provider));
            }
            ProviderOutcome::NoDefinition => {
                tracing::debug!(provider = %provider, "no definition");
            }
            ProviderOutcome::TransportError(source) => {
                tracing::warn!(provider = %provider, "provider failed: {source}");
                if first_error.is_none() {
                    first_error = Some(AggregateError { provider, source });
                }
            }
        }
    }

    if let ResultCap::Total(n) = cap {
        merged.truncate(n.max(1));
    }

    match DefinitionList::from_raw(merged) {
        Some(list) => AggregateResult::Found(list),
        None => match first_error {
            Some(error) => AggregateResult::Failed(error),
            None => AggregateResult::NotFound,
        },
    }
}
