//! Cache store backends
//!
//! The analytics cache talks to a [`CacheStore`]: a byte-oriented key/value
//! store with per-entry time-to-live. Expiry is the store's concern; an
//! expired entry must read back as absent. There is no eviction policy
//! beyond TTL expiry and explicit delete.
//!
//! Two backends ship with the crate: [`MemoryStore`] for tests and
//! single-process deployments, and [`SqliteStore`] when cached analytics
//! should survive restarts.

use crate::error::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Byte-oriented key/value store with per-entry TTL.
///
/// Concurrent `get`/`set`/`delete` must be safe with last-write-wins
/// semantics; nothing stronger is required of a backend.
pub trait CacheStore: Send + Sync {
    /// Fetch a live entry's bytes, or `None` if absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store bytes under a key, expiring after `ttl`.
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Remove an entry. Removing an absent key is a no-op.
    fn delete(&self, key: &str) -> Result<()>;
}

// ============================================
// In-memory store
// ============================================

struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// Mutex-guarded in-memory store.
///
/// Expired entries are dropped lazily on read and swept on every write, so
/// the map never grows past the working set plus not-yet-swept expirations.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.lock().unwrap();
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_vec(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============================================
// SQLite store
// ============================================

/// Durable store backed by a single SQLite table.
///
/// Entries carry a unix-seconds expiry checked on read; expired rows are
/// deleted as they are encountered.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                key        TEXT PRIMARY KEY,
                value      BLOB NOT NULL,
                expires_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }
}

impl CacheStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(Vec<u8>, i64)> = conn
            .query_row(
                "SELECT value, expires_at FROM cache_entries WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((value, expires_at)) if expires_at > Utc::now().timestamp() => Ok(Some(value)),
            Some(_) => {
                conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let expires_at = Utc::now().timestamp() + ttl.as_secs() as i64;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO cache_entries (key, value, expires_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        store.set("k", b"value", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"value".to_vec()));

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_expires() {
        let store = MemoryStore::new();
        store.set("k", b"value", Duration::from_millis(10)).unwrap();
        std::thread::sleep(Duration::from_millis(25));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_overwrite_wins() {
        let store = MemoryStore::new();
        store.set("k", b"first", Duration::from_secs(60)).unwrap();
        store.set("k", b"second", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn test_memory_store_delete_absent_is_noop() {
        let store = MemoryStore::new();
        store.delete("missing").unwrap();
    }

    #[test]
    fn test_sqlite_store_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("k", b"value", Duration::from_secs(60)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"value".to_vec()));

        store.delete("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_expired_entry_reads_absent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("k", b"value", Duration::ZERO).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("k", b"value", Duration::from_secs(60)).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some(b"value".to_vec()));
    }
}
