//! Core trait definitions

use crate::error::VaultResult;

/// String-keyed document store backing one storage scope.
///
/// Values are opaque strings (JSON in practice). Implementations are not
/// required to provide any isolation between concurrent writers: the last
/// `set` for a key wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> VaultResult<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> VaultResult<()>;

    /// Remove `key`, returning whether it was present
    fn remove(&self, key: &str) -> VaultResult<bool>;

    /// List the keys currently present
    fn keys(&self) -> VaultResult<Vec<String>>;
}
