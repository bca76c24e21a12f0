//! Session Types

use crate::auth::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_core::Role;

/// The record of the currently authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    /// Role the user is acting in; starts as the user's own role and
    /// changes only through role switching
    pub user_role: Role,
    pub user_name: String,
    pub started_at: DateTime<Utc>,
    /// Opaque, not cryptographically secure
    pub token: String,
}

impl Session {
    pub fn for_user(user: &User, token: String) -> Self {
        Self {
            user_id: user.id.clone(),
            user_role: user.role,
            user_name: user.name.clone(),
            started_at: Utc::now(),
            token,
        }
    }

    /// Whether the active role differs from the user's own
    pub fn is_role_switched(&self, user: &User) -> bool {
        self.user_role != user.role
    }
}
