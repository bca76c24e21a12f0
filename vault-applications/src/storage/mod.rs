//! Storage Gateway
//!
//! Typed JSON collections over a [`KeyValueStore`](vault_core::KeyValueStore)
//! backend. One backend instance is one storage scope: all users, sessions
//! and content of a "browser profile" live in it.

pub mod file;
pub mod gateway;
pub mod keys;
pub mod memory;

pub use file::FileStore;
pub use gateway::{Fetched, StorageGateway};
pub use keys::StorageKeys;
pub use memory::MemoryStore;

use std::sync::Arc;
use vault_core::{KeyValueStore, StorageBackend, StorageConfig, VaultResult};

/// Open the backend described by `config`
pub fn open_store(config: &StorageConfig) -> VaultResult<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::File => Ok(Arc::new(FileStore::new(expand_home(&config.data_dir))?)),
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> std::path::PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches(['/', '\\']));
        }
    }
    std::path::PathBuf::from(path)
}
