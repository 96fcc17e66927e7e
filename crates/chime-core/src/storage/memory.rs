//! In-memory gateway for tests and ephemeral hosts.

use std::collections::HashMap;
use std::sync::Mutex;

use super::Gateway;
use crate::error::StorageError;

#[derive(Debug, Default)]
pub struct MemoryGateway {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. with a deliberately malformed snapshot.
    pub fn insert(&self, key: &str, value: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.insert(key.to_string(), value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl Gateway for MemoryGateway {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("poisoned lock".to_string()))?
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::QueryFailed("poisoned lock".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load() {
        let gw = MemoryGateway::new();
        assert!(gw.load("k").unwrap().is_none());
        gw.save("k", "v").unwrap();
        assert_eq!(gw.load("k").unwrap().unwrap(), "v");
    }
}
