//! View Context
//!
//! The explicit "who is looking, as which role" value handed to the view
//! composer and to role-gated operations.

use super::{role_can, Action, User};
use crate::session::Session;
use vault_core::Role;

/// Active role plus the optional signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    pub role: Role,
    pub user: Option<User>,
}

impl ViewContext {
    /// Nobody signed in, browsing as `role`
    pub fn anonymous(role: Role) -> Self {
        Self { role, user: None }
    }

    /// Signed-in user acting in their own role
    pub fn for_user(user: User) -> Self {
        Self {
            role: user.role,
            user: Some(user),
        }
    }

    /// Signed-in user acting in the role recorded on the session
    pub fn from_session(session: &Session, user: Option<User>) -> Self {
        Self {
            role: session.user_role,
            user,
        }
    }

    /// Same user, different active role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn display_name(&self) -> &str {
        self.user.as_ref().map_or("User Name", |u| u.name.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Whether the active role may perform `action`
    pub fn can(&self, action: Action) -> bool {
        role_can(self.role, action)
    }
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::anonymous(Role::Founder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NewUser;

    #[test]
    fn test_with_role_keeps_user() {
        let user = User::from_new("7".to_string(), NewUser::new("Zara", "z@x.com", Role::Founder));
        let ctx = ViewContext::for_user(user).with_role(Role::Investor);

        assert_eq!(ctx.role, Role::Investor);
        assert_eq!(ctx.user_id(), Some("7"));
        assert!(ctx.can(Action::EndorsePost));
    }

    #[test]
    fn test_default_is_anonymous_founder() {
        let ctx = ViewContext::default();
        assert_eq!(ctx.role, Role::Founder);
        assert!(!ctx.is_signed_in());
        assert_eq!(ctx.display_name(), "User Name");
    }
}
