//! In-memory progress store

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::ProgressStore;
use crate::error::{LedgerError, Result};

#[derive(Debug, Default)]
struct MemoryState {
    ints: HashMap<String, i64>,
    strings: HashMap<String, String>,
    maps: HashMap<String, BTreeMap<u32, i64>>,
}

/// Store that keeps everything in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl ProgressStore for MemoryStore {
    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.state()?.ints.get(key).copied())
    }

    fn set_int(&self, key: &str, value: i64) -> Result<()> {
        self.state()?.ints.insert(key.to_string(), value);
        Ok(())
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.state()?.strings.get(key).cloned())
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.state()?
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_int_map(&self, key: &str) -> Result<BTreeMap<u32, i64>> {
        Ok(self.state()?.maps.get(key).cloned().unwrap_or_default())
    }

    fn set_int_map_entry(&self, key: &str, field: u32, value: i64) -> Result<()> {
        self.state()?
            .maps
            .entry(key.to_string())
            .or_default()
            .insert(field, value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.state()?;
        state.ints.remove(key);
        state.strings.remove(key);
        state.maps.remove(key);
        Ok(())
    }
}
