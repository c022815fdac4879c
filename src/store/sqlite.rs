//! SQLite-backed progress store
//!
//! Manages the `~/.laurel/ledger.db` database with automatic schema migration.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use super::ProgressStore;
use crate::config::Config;
use crate::error::{LedgerError, Result};

/// Durable store on a single SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the ledger database at the default location (~/.laurel/ledger.db)
    pub fn open_default() -> Result<Self> {
        let db_path = Config::global_config_dir().join("ledger.db");
        Self::open(&db_path)
    }

    /// Open or create the ledger database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| LedgerError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: index map rows by key for whole-dictionary reads
        if version < 2 {
            conn.execute_batch(
                "CREATE INDEX IF NOT EXISTS idx_kv_int_map_key ON kv_int_map(key);",
            )?;
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        Ok(())
    }

    /// Delete every stored value
    pub fn reset_all(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            DELETE FROM kv_int;
            DELETE FROM kv_text;
            DELETE FROM kv_int_map;
            "#,
        )?;
        Ok(())
    }
}

impl ProgressStore for SqliteStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv_int WHERE key = ?1", [key], |r| r.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_int(&self, key: &str, value: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO kv_int (key, value, updated_at) VALUES (?1, ?2, ?3)
               ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3"#,
            rusqlite::params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv_text WHERE key = ?1", [key], |r| r.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO kv_text (key, value, updated_at) VALUES (?1, ?2, ?3)
               ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3"#,
            rusqlite::params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn get_int_map(&self, key: &str) -> Result<BTreeMap<u32, i64>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT field, value FROM kv_int_map WHERE key = ?1")?;
        let rows = stmt.query_map([key], |r| Ok((r.get::<_, u32>(0)?, r.get::<_, i64>(1)?)))?;
        let mut map = BTreeMap::new();
        for row in rows {
            let (field, value) = row?;
            map.insert(field, value);
        }
        Ok(map)
    }

    fn set_int_map_entry(&self, key: &str, field: u32, value: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"INSERT INTO kv_int_map (key, field, value, updated_at) VALUES (?1, ?2, ?3, ?4)
               ON CONFLICT(key, field) DO UPDATE SET value = ?3, updated_at = ?4"#,
            rusqlite::params![key, field, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv_int WHERE key = ?1", [key])?;
        conn.execute("DELETE FROM kv_text WHERE key = ?1", [key])?;
        conn.execute("DELETE FROM kv_int_map WHERE key = ?1", [key])?;
        Ok(())
    }
}

/// SQL schema for the ledger database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
INSERT OR IGNORE INTO schema_version VALUES (1);

-- Integer values (progress counters, flags, cached scores)
CREATE TABLE IF NOT EXISTS kv_int (
    key TEXT PRIMARY KEY,
    value INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- String values (leaderboard rows in name|rank|score form)
CREATE TABLE IF NOT EXISTS kv_text (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Integer dictionaries keyed by small integer ids
CREATE TABLE IF NOT EXISTS kv_int_map (
    key TEXT NOT NULL,
    field INTEGER NOT NULL,
    value INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (key, field)
);
"#;
