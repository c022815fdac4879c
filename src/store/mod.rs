//! Key-value progress storage
//!
//! Achievement counters, reward cursors and leaderboard rows all live behind
//! the [`ProgressStore`] trait. Every mutation is written through immediately;
//! there is no batching and no cache above the backing store.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: process-local maps, for tests and embedding hosts that
//!   persist state themselves
//! - [`SqliteStore`]: durable storage in `~/.laurel/ledger.db`

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::collections::BTreeMap;

use crate::error::Result;

/// Durable key-value storage used by the managers.
///
/// Integer, string and int-dictionary values live in separate namespaces, so
/// the same key may hold one of each. Reads reflect the latest write made
/// through the same store.
pub trait ProgressStore: Send + Sync {
    fn get_int(&self, key: &str) -> Result<Option<i64>>;

    fn set_int(&self, key: &str, value: i64) -> Result<()>;

    fn get_string(&self, key: &str) -> Result<Option<String>>;

    fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Get the whole dictionary stored under `key` (empty if never written)
    fn get_int_map(&self, key: &str) -> Result<BTreeMap<u32, i64>>;

    /// Set a single field of the dictionary stored under `key`
    fn set_int_map_entry(&self, key: &str, field: u32, value: i64) -> Result<()>;

    /// Remove `key` from every namespace
    fn delete(&self, key: &str) -> Result<()>;

    /// Read an integer, falling back to `default` when the key was never set
    fn get_int_or(&self, key: &str, default: i64) -> Result<i64> {
        Ok(self.get_int(key)?.unwrap_or(default))
    }

    /// Read a single dictionary field
    fn get_int_map_entry(&self, key: &str, field: u32) -> Result<Option<i64>> {
        Ok(self.get_int_map(key)?.get(&field).copied())
    }

    /// Whether `key` holds a value in any namespace
    fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_int(key)?.is_some()
            || self.get_string(key)?.is_some()
            || !self.get_int_map(key)?.is_empty())
    }
}
