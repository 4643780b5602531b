//! In-memory storage backend
//!
//! A single `HashMap` behind a `parking_lot::RwLock`: reads share the lock,
//! writes take it exclusively. parking_lot's lock is eventually fair, so a
//! steady stream of readers cannot starve a writer forever.

use crate::config::StoreConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::info;

/// Concurrent key-value map shared by every session
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store sized from configuration
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            data: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    /// Set a value, replacing any previous one
    pub fn set(&self, key: String, value: String) {
        self.data.write().insert(key, value);
    }

    /// Delete a key
    ///
    /// Returns `true` if the key existed, `false` otherwise. Lookup and removal
    /// happen under one write guard.
    pub fn delete(&self, key: &str) -> bool {
        self.data.write().remove(key).is_some()
    }

    /// Check whether a key is present
    pub fn exists(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// Snapshot of all keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Remove every entry
    pub fn flush(&self) {
        let removed = {
            let mut data = self.data.write();
            let n = data.len();
            data.clear();
            n
        };
        info!(removed, "Store flushed");
    }

    /// Number of entries
    pub fn size(&self) -> usize {
        self.data.read().len()
    }
}
