//! User-interface preferences
//!
//! Only the colour theme is persisted. A missing or unrecognised stored
//! value reads as the light theme.

use crate::storage::StorageGateway;
use crate::ApplicationResult;
use tracing::debug;
use vault_core::Theme;

#[derive(Debug, Clone)]
pub struct Preferences {
    gateway: StorageGateway,
}

impl Preferences {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    pub fn theme(&self) -> Theme {
        self.gateway.load(&self.gateway.keys().theme)
    }

    pub fn set_theme(&self, theme: Theme) -> ApplicationResult<()> {
        self.gateway.save(&self.gateway.keys().theme, &theme)?;
        debug!(theme = %theme, "Theme saved");
        Ok(())
    }

    /// Switch between light and dark; returns the new theme
    pub fn toggle_theme(&self) -> ApplicationResult<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageKeys};
    use std::sync::Arc;

    fn preferences() -> Preferences {
        Preferences::new(StorageGateway::new(
            Arc::new(MemoryStore::new()),
            StorageKeys::default(),
        ))
    }

    #[test]
    fn test_defaults_to_light() {
        assert_eq!(preferences().theme(), Theme::Light);
    }

    #[test]
    fn test_toggle_round_trip() {
        let preferences = preferences();
        assert_eq!(preferences.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(preferences.theme(), Theme::Dark);
        assert_eq!(preferences.toggle_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_unknown_value_reads_light() {
        let preferences = preferences();
        preferences
            .gateway
            .store()
            .set("vault_theme", "\"sepia\"")
            .unwrap();
        assert_eq!(preferences.theme(), Theme::Light);
    }
}
