//! Configuration management

use crate::error::{ErrorContext, VaultError, VaultResult};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub content: ContentConfig,
    pub logging: LoggingConfig,
}

/// Which backend holds the storage scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    Memory,
    /// One JSON file per key under `data_dir`
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the file backend; a leading `~` expands to the home directory
    pub data_dir: String,
    /// Prefix applied to every storage key
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: "~/.vault-africa/data".to_string(),
            key_prefix: "vault".to_string(),
        }
    }
}

impl StorageConfig {
    /// In-memory scope, used by tests and throwaway demos
    pub fn memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Prefix of issued session tokens
    pub token_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_prefix: "vault_".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Write demo posts, notifications and activities into an empty scope
    pub seed_demo_data: bool,
    /// Vault score points awarded to a founder whose post is endorsed
    pub endorsement_points: i64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
            endorsement_points: 5,
        }
    }
}

impl VaultConfig {
    /// In-memory configuration with demo seeding disabled
    pub fn in_memory() -> Self {
        Self {
            storage: StorageConfig::memory(),
            content: ContentConfig {
                seed_demo_data: false,
                ..ContentConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> VaultResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VaultError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: VaultConfig = toml::from_str(&content).map_err(|e| VaultError::Config {
            message: format!("Failed to parse config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("parse_toml")
                .with_suggestion("Check TOML syntax in config file"),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> VaultResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| VaultError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content).map_err(|e| VaultError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> VaultResult<()> {
        let prefix = &self.storage.key_prefix;
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(crate::validation_error!(
                "Key prefix must be non-empty and use only letters, digits, '_' or '-'",
                "storage.key_prefix",
                "config"
            ));
        }

        if self.storage.backend == StorageBackend::File && self.storage.data_dir.trim().is_empty()
        {
            return Err(crate::config_error!(
                "storage.data_dir is required for the file backend",
                "config"
            ));
        }

        if self.session.token_prefix.is_empty() {
            return Err(crate::validation_error!(
                "Token prefix must not be empty",
                "session.token_prefix",
                "config"
            ));
        }

        if !(0..=100).contains(&self.content.endorsement_points) {
            return Err(crate::validation_error!(
                "Endorsement points must be within 0..=100",
                "content.endorsement_points",
                "config"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(VaultConfig::default().validate().is_ok());
        assert!(VaultConfig::in_memory().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: VaultConfig = toml::from_str(
            r#"
            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.key_prefix, "vault");
        assert_eq!(config.content.endorsement_points, 5);
    }

    #[test]
    fn test_rejects_path_like_prefix() {
        let mut config = VaultConfig::default();
        config.storage.key_prefix = "../etc".to_string();

        match config.validate() {
            Err(VaultError::Validation { field, .. }) => {
                assert_eq!(field.as_deref(), Some("storage.key_prefix"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
