use tuidict_core::cache::{self, CacheGateway, MemoryCache};
use tuidict_core::provider::ProviderError;
use tuidict_core::types::DefinitionList;

use super::support::{CannedProvider, pipeline};
use crate::{LookupStatus, lookup_once};

#[tokio::test]
async fn found_is_printed_and_cached() {
    let provider = CannedProvider::found("canned", &["a small feline", "  ", "a jazz musician"]);
    let cache = cache::shared(MemoryCache::new());
    let pipeline = pipeline(vec![provider.clone()], cache.clone());

    let mut out = Vec::new();
    let status = lookup_once(&pipeline, "Cats", &mut out).await.unwrap();

    assert_eq!(status, LookupStatus::Found);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "cat\n  1. a small feline\n  2. a jazz musician\n"
    );
    let entry = cache.lock().unwrap().lookup("cat").unwrap().unwrap();
    assert_eq!(entry.definitions.len(), 2);

    // Second lookup is served from the cache
    let mut out = Vec::new();
    lookup_once(&pipeline, "cat", &mut out).await.unwrap();
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn cached_entry_skips_providers() {
    let provider = CannedProvider::found("canned", &["fresh"]);
    let mut memory = MemoryCache::new();
    memory
        .store("dog", &DefinitionList::from_raw(["from cache"]).unwrap())
        .unwrap();
    let pipeline = pipeline(vec![provider.clone()], cache::shared(memory));

    let mut out = Vec::new();
    lookup_once(&pipeline, "dogs", &mut out).await.unwrap();

    assert_eq!(provider.calls(), 0);
    assert!(String::from_utf8(out).unwrap().contains("from cache"));
}

#[tokio::test]
async fn not_found_is_reported_not_cached() {
    let provider = CannedProvider::failing("canned", ProviderError::NoDefinition);
    let cache = cache::shared(MemoryCache::new());
    let pipeline = pipeline(vec![provider], cache.clone());

    let mut out = Vec::new();
    let status = lookup_once(&pipeline, "zzyzx", &mut out).await.unwrap();

    assert_eq!(status, LookupStatus::NotFound);
    assert!(cache.lock().unwrap().keys().unwrap().is_empty());
}

#[tokio::test]
async fn failed_search_is_an_error() {
    let provider = CannedProvider::failing("flaky", ProviderError::Http(503));
    let pipeline = pipeline(vec![provider], cache::shared(MemoryCache::new()));

    let mut out = Vec::new();
    let err = lookup_once(&pipeline, "cat", &mut out).await.unwrap_err();

    assert!(err.to_string().contains("flaky: HTTP 503"));
}
