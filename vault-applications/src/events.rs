//! Data change events
//!
//! Broadcast after each mutation completes, so subscribers re-render on the
//! event rather than after a guessed delay.

use serde::{Deserialize, Serialize};
use vault_core::{Role, Theme};

/// Capacity of the broadcast channel; slow receivers lag past this
pub const EVENT_BUFFER: usize = 100;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DataEvent {
    /// Application constructed and demo data in place
    Ready,
    SessionStarted { user_id: String, role: Role },
    SessionEnded,
    RoleSwitched { from: Role, to: Role },
    PostAdded { post_id: String },
    PostUpdated { post_id: String },
    SavedFoundersChanged { founder_id: String, saved: bool },
    NotificationAdded { notification_id: String, user_id: String },
    NotificationRead { notification_id: String },
    ThemeChanged { theme: Theme },
    DemoDataReset,
    /// Message meant for the user, e.g. a refused action
    Notice { level: NoticeLevel, message: String },
}

impl DataEvent {
    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self::Notice {
            level,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::notice(NoticeLevel::Error, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::notice(NoticeLevel::Success, message)
    }

    /// Whether a view showing content should be recomposed
    pub fn changes_content(&self) -> bool {
        !matches!(self, DataEvent::Notice { .. } | DataEvent::ThemeChanged { .. })
    }
}
