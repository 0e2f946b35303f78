use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tuidict_core::cache::{CacheEntry, CacheError, CacheGateway};
use tuidict_core::types::DefinitionList;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS dictionaries (
    word TEXT PRIMARY KEY,
    definition TEXT NOT NULL,
    created_at TEXT NOT NULL
);
";

/// One SQLite database per target, `word` → JSON array of definitions
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(CacheError::backend)?;
        }
        let conn = Connection::open(path).map_err(CacheError::backend)?;
        tracing::info!("opened cache at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory().map_err(CacheError::backend)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, CacheError> {
        conn.execute_batch(SCHEMA).map_err(CacheError::backend)?;
        Ok(Self { conn })
    }
}

fn decode(key: &str, definition: &str, created_at: &str) -> Result<CacheEntry, CacheError> {
    let definitions: DefinitionList =
        serde_json::from_str(definition).map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    let created_at = DateTime::parse_from_rfc3339(created_at)
        .map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?
        .with_timezone(&Utc);

    Ok(CacheEntry {
        canonical_key: key.to_string(),
        definitions,
        created_at,
    })
}

impl CacheGateway for SqliteCache {
    fn lookup(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT definition, created_at FROM dictionaries WHERE word = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(CacheError::backend)?;

        row.map(|(definition, created_at)| decode(key, &definition, &created_at))
            .transpose()
    }

    fn store(&mut self, key: &str, definitions: &DefinitionList) -> Result<(), CacheError> {
        let definition = serde_json::to_string(definitions).map_err(CacheError::backend)?;
        let created_at = Utc::now().to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO dictionaries (word, definition, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(word) DO UPDATE SET definition = excluded.definition, created_at = excluded.created_at",
                params![key, definition, created_at],
            )
            .map_err(CacheError::backend)?;

        tracing::debug!(key, count = definitions.len(), "cached definitions");
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut stmt = self
            .conn
            .prepare("SELECT word FROM dictionaries ORDER BY rowid")
            .map_err(CacheError::backend)?;
        let words = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(CacheError::backend)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(CacheError::backend)?;
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs(items: &[&str]) -> DefinitionList {
        DefinitionList::from_raw(items.iter().copied()).unwrap()
    }

    #[test]
    fn round_trips_entries() {
        let mut cache = SqliteCache::open_in_memory().unwrap();
        let list = defs(&["joyful", "content; pleased"]);

        cache.store("happy", &list).unwrap();
        let entry = cache.lookup("happy").unwrap().unwrap();

        assert_eq!(entry.canonical_key, "happy");
        assert_eq!(entry.definitions, list);
        assert!(cache.lookup("sad").unwrap().is_none());
    }

    #[test]
    fn upsert_replaces_and_keeps_position() {
        let mut cache = SqliteCache::open_in_memory().unwrap();
        cache.store("b", &defs(&["first"])).unwrap();
        cache.store("a", &defs(&["x"])).unwrap();
        cache.store("b", &defs(&["second"])).unwrap();

        assert_eq!(cache.lookup("b").unwrap().unwrap().definitions, defs(&["second"]));
        assert_eq!(cache.keys().unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("words.db");

        {
            let mut cache = SqliteCache::open(&path).unwrap();
            cache.store("cat", &defs(&["feline"])).unwrap();
        }

        let cache = SqliteCache::open(&path).unwrap();
        assert_eq!(cache.lookup("cat").unwrap().unwrap().definitions, defs(&["feline"]));
    }

    #[test]
    fn corrupt_row_is_reported() {
        let cache = SqliteCache::open_in_memory().unwrap();
        cache
            .conn
            .execute(
                "INSERT INTO dictionaries (word, definition, created_at) VALUES ('bad', '[]', '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        assert!(matches!(cache.lookup("bad"), Err(CacheError::Corrupt { .. })));
    }
}
