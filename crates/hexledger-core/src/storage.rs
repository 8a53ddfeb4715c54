use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use crate::CoreError;

/// Durable key-value contract the ledger store persists through.
///
/// Values are whole snapshots; backends never see partial updates.
pub trait RecordStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;
    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

/// In-memory storage with an optional byte quota per value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any write whose value exceeds `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Seeds a value directly, bypassing the quota.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.into(), value.into());
    }
}

impl RecordStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(CoreError::Storage(format!(
                    "quota exceeded writing `{}`: {} bytes over a {} byte limit",
                    key,
                    value.len(),
                    quota
                )));
            }
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: RecordStorage + ?Sized> RecordStorage for std::sync::Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).write(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let storage = MemoryStorage::new();
        assert!(storage.read("financialRecords").unwrap().is_none());
    }

    #[test]
    fn quota_rejects_large_values() {
        let storage = MemoryStorage::with_quota(4);
        assert!(storage.write("k", "1234").is_ok());
        let err = storage.write("k", "12345").expect_err("over quota");
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("1234"));
    }
}
