use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tuidict_types::DefinitionList;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub canonical_key: String,
    pub definitions: DefinitionList,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("corrupt cache entry for '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("cache lock poisoned")]
    Poisoned,
}

impl CacheError {
    pub fn backend(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        CacheError::Backend(Box::new(e))
    }
}

/// Persistent word → definitions store for one target namespace
pub trait CacheGateway: Send {
    fn lookup(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Insert or replace; the later write wins
    fn store(&mut self, key: &str, definitions: &DefinitionList) -> Result<(), CacheError>;

    /// Every cached key, oldest first
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

pub type SharedCache = Arc<Mutex<Box<dyn CacheGateway>>>;

pub fn shared(cache: impl CacheGateway + 'static) -> SharedCache {
    Arc::new(Mutex::new(Box::new(cache)))
}

/// In-process cache used by tests and `--no-cache` runs
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, CacheEntry>,
    order: Vec<String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheGateway for MemoryCache {
    fn lookup(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, definitions: &DefinitionList) -> Result<(), CacheError> {
        let entry = CacheEntry {
            canonical_key: key.to_string(),
            definitions: definitions.clone(),
            created_at: Utc::now(),
        };
        if self.entries.insert(key.to_string(), entry).is_none() {
            self.order.push(key.to_string());
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.order.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_store_wins_and_keeps_insertion_order() {
        let mut cache = MemoryCache::new();
        let first = DefinitionList::from_raw(["old"]).unwrap();
        let second = DefinitionList::from_raw(["new"]).unwrap();

        cache.store("cat", &first).unwrap();
        cache.store("dog", &first).unwrap();
        cache.store("cat", &second).unwrap();

        assert_eq!(cache.lookup("cat").unwrap().unwrap().definitions, second);
        assert_eq!(cache.keys().unwrap(), vec!["cat", "dog"]);
        assert!(cache.lookup("bird").unwrap().is_none());
    }
}
