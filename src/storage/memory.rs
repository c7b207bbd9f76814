//! In-memory storage. Used for session scope and in tests.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{KeyValueStorage, StorageError};

/// Volatile key-value storage with an optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    /// Max total bytes of keys plus values
    quota: RwLock<Option<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: RwLock::new(Some(limit)),
        }
    }

    /// Change the quota. `None` removes the limit.
    pub fn set_quota(&self, limit: Option<usize>) {
        *self.quota.write() = limit;
    }

    /// Total bytes currently stored
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();

        if let Some(limit) = *self.quota.read() {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
