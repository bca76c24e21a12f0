//! Role permissions
//!
//! Which role may perform which user action. Checks are the only gate; a
//! rejected action changes no state.

use crate::{ApplicationError, ApplicationResult};
use vault_core::Role;

/// User actions that are gated by role
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Action {
    /// Publish a post
    CreatePost,
    /// Endorse someone else's post
    EndorsePost,
    /// Like or unlike a post
    LikePost,
    /// Share a post
    SharePost,
    /// Bookmark a founder from discovery
    SaveFounder,
}

impl Action {
    /// Roles allowed to perform this action
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Action::CreatePost => &[Role::Founder],
            Action::EndorsePost => &[Role::Investor, Role::Mentor],
            Action::SaveFounder => &[Role::Investor, Role::Mentor],
            Action::LikePost | Action::SharePost => &Role::ALL,
        }
    }

    /// Message shown to the user when the action is refused
    pub fn rejection_message(&self) -> &'static str {
        match self {
            Action::CreatePost => "Only founders can publish posts",
            Action::EndorsePost => "Only investors and mentors can endorse posts",
            Action::SaveFounder => "Only investors and mentors can save founders",
            Action::LikePost => "You cannot like posts",
            Action::SharePost => "You cannot share posts",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::CreatePost => write!(f, "create_post"),
            Action::EndorsePost => write!(f, "endorse_post"),
            Action::LikePost => write!(f, "like_post"),
            Action::SharePost => write!(f, "share_post"),
            Action::SaveFounder => write!(f, "save_founder"),
        }
    }
}

/// Whether `role` may perform `action`
pub fn role_can(role: Role, action: Action) -> bool {
    action.allowed_roles().contains(&role)
}

/// Fail with a permission error carrying the user-facing message
pub fn require(role: Role, action: Action) -> ApplicationResult<()> {
    if role_can(role, action) {
        Ok(())
    } else {
        Err(ApplicationError::permission(action.rejection_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_investors_and_mentors_endorse() {
        assert!(!role_can(Role::Founder, Action::EndorsePost));
        assert!(role_can(Role::Investor, Action::EndorsePost));
        assert!(role_can(Role::Mentor, Action::EndorsePost));
    }

    #[test]
    fn test_everyone_likes_and_shares() {
        for role in Role::ALL {
            assert!(role_can(role, Action::LikePost));
            assert!(role_can(role, Action::SharePost));
        }
    }

    #[test]
    fn test_require_reports_message() {
        let err = require(Role::Founder, Action::EndorsePost).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Permission error: Only investors and mentors can endorse posts"
        );
        assert!(err.is_user_facing());
    }
}
