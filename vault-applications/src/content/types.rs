//! Content record types
//!
//! Posts, notifications and activities as stored, plus the `New*` inputs
//! the stores fill defaults into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_core::Role;

/// Engagement counters on a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub views: u32,
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
    pub endorsements: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `None` means visible to every role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_visible: Option<Vec<Role>>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub stats: PostStats,
}

impl Post {
    pub fn is_visible_to(&self, role: Role) -> bool {
        is_visible_to(self.role_visible.as_deref(), role)
    }
}

/// Fields supplied when publishing a post; unset fields take defaults
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub role_visible: Option<Vec<Role>>,
}

impl NewPost {
    pub fn titled(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn by_author(mut self, id: impl Into<String>, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        self.author_id = Some(id.into());
        self.author_name = Some(name.into());
        self.author_avatar = Some(avatar.into());
        self
    }

    pub fn visible_to(mut self, roles: Vec<Role>) -> Self {
        self.role_visible = Some(roles);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    /// Type tag; drives the icon
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub unread: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
    /// Anything but `Some(false)` creates an unread notification
    pub unread: Option<bool>,
}

impl NewNotification {
    pub fn to_user(
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            title: Some(title.into()),
            message: Some(message.into()),
            kind: Some(kind.into()),
            unread: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_visible: Option<Vec<Role>>,
}

impl Activity {
    pub fn is_visible_to(&self, role: Role) -> bool {
        is_visible_to(self.role_visible.as_deref(), role)
    }
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: String,
    pub kind: String,
    pub content: String,
    pub role_visible: Option<Vec<Role>>,
}

impl NewActivity {
    pub fn new(user_id: impl Into<String>, kind: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            kind: kind.into(),
            content: content.into(),
            role_visible: None,
        }
    }

    pub fn visible_to(mut self, roles: Vec<Role>) -> Self {
        self.role_visible = Some(roles);
        self
    }
}

/// Absent visibility admits every role
pub fn is_visible_to(role_visible: Option<&[Role]>, role: Role) -> bool {
    role_visible.map_or(true, |roles| roles.contains(&role))
}

/// Deduplicate a visibility list; an empty list becomes "all roles"
pub fn normalize_visibility(roles: Vec<Role>) -> Vec<Role> {
    let mut roles = roles;
    roles.sort();
    roles.dedup();
    if roles.is_empty() {
        Role::ALL.to_vec()
    } else {
        roles
    }
}
