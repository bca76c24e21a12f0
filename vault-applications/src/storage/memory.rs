//! In-memory key-value backend

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use vault_core::{storage_error, KeyValueStore, VaultResult};

/// Process-local store. Clones share the same map, which is how two
/// gateways ("tabs") over one scope are modelled in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| storage_error!("memory store lock poisoned", "memory_store"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| storage_error!("memory store lock poisoned", "memory_store"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<bool> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| storage_error!("memory store lock poisoned", "memory_store"))?;
        Ok(entries.remove(key).is_some())
    }

    fn keys(&self) -> VaultResult<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| storage_error!("memory store lock poisoned", "memory_store"))?;
        Ok(entries.keys().cloned().collect())
    }
}
