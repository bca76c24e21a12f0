//! Typed JSON access to the key-value backend

use super::StorageKeys;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use vault_core::{KeyValueStore, VaultResult};

/// Result of reading one key, with corruption made explicit
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Present(T),
    Missing,
    /// The key holds something that does not decode as `T`
    Corrupt(String),
}

impl<T> Fetched<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Fetched::Present(value) => Some(value),
            Fetched::Missing | Fetched::Corrupt(_) => None,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Fetched::Corrupt(_))
    }
}

/// Gateway over one storage scope
#[derive(Clone)]
pub struct StorageGateway {
    store: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Read and decode `key`, reporting corruption instead of hiding it
    pub fn fetch<T: DeserializeOwned>(&self, key: &str) -> VaultResult<Fetched<T>> {
        let raw = match self.store.get(key)? {
            Some(raw) => raw,
            None => return Ok(Fetched::Missing),
        };

        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => Ok(Fetched::Present(value)),
            // a stored `null` reads like an absent key
            Ok(None) => Ok(Fetched::Missing),
            Err(e) => Ok(Fetched::Corrupt(e.to_string())),
        }
    }

    /// Read `key`, degrading a missing, corrupt or unreadable value to `T::default()`
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_optional(key).unwrap_or_default()
    }

    /// Read `key`, degrading every failure to `None`
    pub fn load_optional<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.fetch(key) {
            Ok(Fetched::Present(value)) => Some(value),
            Ok(Fetched::Missing) => None,
            Ok(Fetched::Corrupt(reason)) => {
                warn!(key = key, reason = %reason, "Stored value is corrupt, using default");
                None
            }
            Err(e) => {
                e.log();
                None
            }
        }
    }

    /// Serialize and persist `value` under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> VaultResult<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)?;
        debug!(key = key, bytes = json.len(), "Saved collection");
        Ok(())
    }

    /// Remove `key`
    pub fn clear(&self, key: &str) -> VaultResult<bool> {
        self.store.remove(key)
    }

    /// Whether any value (even a corrupt one) is stored under `key`
    pub fn contains(&self, key: &str) -> VaultResult<bool> {
        Ok(self.store.get(key)?.is_some())
    }

    /// Full read-modify-write of the collection under `key`.
    ///
    /// Not atomic: another gateway writing the same key between the read and
    /// the write is silently overwritten.
    pub fn update<T, R, F>(&self, key: &str, f: F) -> VaultResult<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let mut value: T = self.load(key);
        let result = f(&mut value);
        self.save(key, &value)?;
        Ok(result)
    }
}

impl std::fmt::Debug for StorageGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageGateway")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn gateway() -> StorageGateway {
        StorageGateway::new(Arc::new(MemoryStore::new()), StorageKeys::default())
    }

    #[test]
    fn test_corrupt_json_degrades_to_default() {
        let gateway = gateway();
        gateway.store().set("vault_posts", "{not json").unwrap();

        let posts: Vec<String> = gateway.load("vault_posts");
        assert!(posts.is_empty());

        let fetched: Fetched<Vec<String>> = gateway.fetch("vault_posts").unwrap();
        assert!(fetched.is_corrupt());
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let gateway = gateway();
        gateway.store().set("vault_likes", "{\"a\":1}").unwrap();

        let fetched: Fetched<Vec<String>> = gateway.fetch("vault_likes").unwrap();
        assert!(fetched.is_corrupt());
        assert!(gateway.load::<Vec<String>>("vault_likes").is_empty());
    }

    #[test]
    fn test_null_reads_as_missing() {
        let gateway = gateway();
        gateway.store().set("vault_current_session", "null").unwrap();

        let fetched: Fetched<String> = gateway.fetch("vault_current_session").unwrap();
        assert_eq!(fetched, Fetched::Missing);
    }

    #[test]
    fn test_update_round_trips() {
        let gateway = gateway();

        let len = gateway
            .update("vault_likes", |likes: &mut Vec<String>| {
                likes.push("post_1".to_string());
                likes.len()
            })
            .unwrap();

        assert_eq!(len, 1);
        assert_eq!(
            gateway.load::<Vec<String>>("vault_likes"),
            vec!["post_1".to_string()]
        );
    }
}
