use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tuidict_core::aggregate::Aggregator;
use tuidict_core::cache::SharedCache;
use tuidict_core::language::Normalizer;
use tuidict_core::provider::{Provider, ProviderError};
use tuidict_core::search::SearchPipeline;
use tuidict_lang_english::EnglishNormalizer;

/// Provider answering every term with the same canned result
pub struct CannedProvider {
    name: &'static str,
    answer: Result<Vec<String>, ProviderError>,
    calls: AtomicUsize,
}

impl CannedProvider {
    pub fn found(name: &'static str, definitions: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer: Ok(definitions.iter().map(|d| d.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(name: &'static str, error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer: Err(error),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for CannedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn search(&self, _term: &str) -> Result<Vec<String>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

pub fn english() -> Arc<dyn Normalizer> {
    Arc::new(EnglishNormalizer::new().unwrap())
}

pub fn pipeline(providers: Vec<Arc<CannedProvider>>, cache: SharedCache) -> SearchPipeline {
    let providers: Vec<Arc<dyn Provider>> = providers
        .into_iter()
        .map(|p| p as Arc<dyn Provider>)
        .collect();
    let aggregator = Aggregator::new(providers, Duration::from_secs(1));
    SearchPipeline::new(english(), cache, Arc::new(aggregator))
}
