use std::sync::Arc;

use tuidict_types::Query;

use crate::aggregate::{AggregateResult, Aggregator};
use crate::cache::{CacheError, SharedCache};
use crate::language::Normalizer;

/// What one `Search` command produced
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Completed {
        query: Query,
        result: AggregateResult,
        cached: bool,
    },
    NormalizeFailed(String),
    CacheFailed(String),
}

/// normalize → cache lookup → provider fan-out
#[derive(Clone)]
pub struct SearchPipeline {
    normalizer: Arc<dyn Normalizer>,
    cache: SharedCache,
    aggregator: Arc<Aggregator>,
}

impl SearchPipeline {
    pub fn new(normalizer: Arc<dyn Normalizer>, cache: SharedCache, aggregator: Arc<Aggregator>) -> Self {
        Self {
            normalizer,
            cache,
            aggregator,
        }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub async fn run(&self, raw: &str) -> SearchOutcome {
        let query = match self.normalizer.query(raw).await {
            Ok(query) => query,
            Err(e) => {
                tracing::warn!("normalization failed for {raw:?}: {e}");
                return SearchOutcome::NormalizeFailed(e.to_string());
            }
        };

        match self.lookup(query.canonical_key()) {
            Ok(Some(result)) => {
                tracing::debug!(key = query.canonical_key(), "cache hit");
                return SearchOutcome::Completed {
                    query,
                    result,
                    cached: true,
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("cache lookup failed: {e}");
                return SearchOutcome::CacheFailed(e.to_string());
            }
        }

        let result = self.aggregator.aggregate(query.canonical_key()).await;
        SearchOutcome::Completed {
            query,
            result,
            cached: false,
        }
    }

    fn lookup(&self, key: &str) -> Result<Option<AggregateResult>, CacheError> {
        let cache = self.cache.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(cache
            .lookup(key)?
            .map(|entry| AggregateResult::Found(entry.definitions)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tuidict_types::{DefinitionList, Language};

    use super::*;
    use crate::cache::{CacheEntry, CacheGateway, MemoryCache, shared};
    use crate::language::{NormalizeError, ValidationError};
    use crate::provider::{Provider, ProviderError};

    struct Lowercase;

    #[async_trait]
    impl Normalizer for Lowercase {
        fn language(&self) -> Language {
            Language::English
        }

        fn validate(&self, _raw: &str) -> Result<(), ValidationError> {
            Ok(())
        }

        async fn normalize(&self, raw: &str) -> Result<String, NormalizeError> {
            if raw.contains("offline") {
                return Err(NormalizeError::Transport("connection refused".into()));
            }
            Ok(raw.trim().to_lowercase())
        }
    }

    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Provider for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        async fn search(&self, term: &str) -> Result<Vec<String>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!("meaning of {term}")])
        }
    }

    struct Broken;

    impl CacheGateway for Broken {
        fn lookup(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
            Err(CacheError::Corrupt {
                key: "x".into(),
                reason: "bad json".into(),
            })
        }

        fn store(&mut self, _key: &str, _definitions: &DefinitionList) -> Result<(), CacheError> {
            Ok(())
        }

        fn keys(&self) -> Result<Vec<String>, CacheError> {
            Ok(Vec::new())
        }
    }

    fn pipeline(cache: SharedCache) -> (SearchPipeline, Arc<Counting>) {
        let provider = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let aggregator = Aggregator::new(vec![provider.clone()], Duration::from_secs(1));
        (
            SearchPipeline::new(Arc::new(Lowercase), cache, Arc::new(aggregator)),
            provider,
        )
    }

    #[tokio::test]
    async fn miss_goes_to_providers_with_canonical_key() {
        let (pipeline, provider) = pipeline(shared(MemoryCache::new()));

        match pipeline.run("  CAT ").await {
            SearchOutcome::Completed { query, result, cached } => {
                assert!(!cached);
                assert_eq!(query.canonical_key(), "cat");
                assert_eq!(
                    result,
                    AggregateResult::Found(DefinitionList::from_raw(["meaning of cat"]).unwrap())
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hit_skips_providers() {
        let mut memory = MemoryCache::new();
        memory
            .store("cat", &DefinitionList::from_raw(["cached meaning"]).unwrap())
            .unwrap();
        let (pipeline, provider) = pipeline(shared(memory));

        match pipeline.run("Cat").await {
            SearchOutcome::Completed { result, cached, .. } => {
                assert!(cached);
                assert_eq!(
                    result,
                    AggregateResult::Found(DefinitionList::from_raw(["cached meaning"]).unwrap())
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn normalize_failure_never_reaches_providers() {
        let (pipeline, provider) = pipeline(shared(MemoryCache::new()));

        assert!(matches!(
            pipeline.run("offline").await,
            SearchOutcome::NormalizeFailed(_)
        ));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cache_read_error_is_reported() {
        let (pipeline, provider) = pipeline(shared(Broken));

        assert!(matches!(pipeline.run("cat").await, SearchOutcome::CacheFailed(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
