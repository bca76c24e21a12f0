//! File-backed key-value store
//!
//! Each key is persisted as `<key>.json` inside the storage directory.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vault_core::{validation_error, KeyValueStore, VaultResult};

/// Directory-backed store
#[derive(Debug, Clone)]
pub struct FileStore {
    storage_dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `storage_dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> VaultResult<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        info!("File store initialized at: {}", storage_dir.display());

        Ok(Self { storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn key_path(&self, key: &str) -> VaultResult<PathBuf> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            || key.starts_with('.')
        {
            return Err(validation_error!(
                format!("Invalid storage key: {:?}", key),
                "key",
                "file_store"
            ));
        }
        Ok(self.storage_dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let data = std::fs::read_to_string(&path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(Some(data))
    }

    fn set(&self, key: &str, value: &str) -> VaultResult<()> {
        let path = self.key_path(key)?;
        // write beside the target and rename, so a crash never leaves a
        // truncated value under the key
        let tmp_path = self.storage_dir.join(format!(".{}.json.tmp", key));
        std::fs::write(&tmp_path, value)?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<bool> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(false);
        }

        std::fs::remove_file(&path)?;
        debug!("Removed {}", path.display());
        Ok(true)
    }

    fn keys(&self) -> VaultResult<Vec<String>> {
        let mut keys = Vec::new();

        for entry in std::fs::read_dir(&self.storage_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}
