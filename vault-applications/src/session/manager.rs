//! Session Manager
//!
//! Login, signup, logout and role switching over a single storage scope.
//! Starting a session supersedes whatever session was current; nothing is
//! merged.

use super::Session;
use crate::auth::identity::is_valid_email;
use crate::auth::{NewUser, User, UserStore};
use crate::ids::generate_token;
use crate::storage::StorageGateway;
use crate::{ApplicationError, ApplicationResult};
use tracing::{debug, info, warn};
use vault_core::{validation_error, Role};

#[derive(Debug, Clone)]
pub struct SessionManager {
    gateway: StorageGateway,
    users: UserStore,
    token_prefix: String,
}

impl SessionManager {
    pub fn new(gateway: StorageGateway, users: UserStore, token_prefix: impl Into<String>) -> Self {
        Self {
            gateway,
            users,
            token_prefix: token_prefix.into(),
        }
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Make `user` the current session and append it to the history
    pub fn start_session(&self, user: &User) -> ApplicationResult<Session> {
        let keys = self.gateway.keys();
        let session = Session::for_user(user, generate_token(&self.token_prefix));

        self.gateway.save(&keys.current_session, &session)?;
        self.gateway
            .update(&keys.sessions, |history: &mut Vec<Session>| {
                history.push(session.clone())
            })?;

        info!(user_id = %session.user_id, role = %session.user_role, "Session started");
        Ok(session)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.gateway
            .load_optional(&self.gateway.keys().current_session)
    }

    /// The stored user behind the current session
    pub fn current_user(&self) -> Option<User> {
        let session = self.current_session()?;
        let user = self.users.get_user_by_id(&session.user_id);
        if user.is_none() {
            warn!(user_id = %session.user_id, "Current session refers to an unknown user");
        }
        user
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_session().is_some()
    }

    /// Clear the current session; the history is kept. Returns whether a
    /// session was current.
    pub fn end_session(&self) -> ApplicationResult<bool> {
        let ended = self
            .gateway
            .clear(&self.gateway.keys().current_session)?;
        if ended {
            info!("Session ended");
        }
        Ok(ended)
    }

    /// Every session ever started in this scope, oldest first
    pub fn session_history(&self) -> Vec<Session> {
        self.gateway.load(&self.gateway.keys().sessions)
    }

    /// Sign in by email.
    ///
    /// An unknown email signs the user up on the spot with a name taken from
    /// the email. A known user with a stored password must present it.
    pub fn login(&self, email: &str, password: &str, role: Role) -> ApplicationResult<Session> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(validation_error!(
                format!("Invalid email address: {}", email),
                "email",
                "session_manager"
            )
            .into());
        }

        let user = match self.users.find_user_by_email(email) {
            Some(user) => {
                if !user.password_matches(password) {
                    debug!(email = email, "Password mismatch");
                    return Err(ApplicationError::authentication("Invalid email or password"));
                }
                user
            }
            None => {
                debug!(email = email, "No user for email, signing up");
                let password = (!password.is_empty()).then_some(password);
                self.users.create_user_from_email(email, password, role)?
            }
        };

        self.start_session(&user)
    }

    /// Create the user (idempotent by email) and start a session for them
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ApplicationResult<Session> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(validation_error!(
                format!("Invalid email address: {}", email),
                "email",
                "session_manager"
            )
            .into());
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(validation_error!("Name is required", "name", "session_manager").into());
        }

        // a taken email signs in as its owner; the stored password must match
        if let Some(existing) = self.users.find_user_by_email(email) {
            if !existing.password_matches(password) {
                debug!(email = email, "Signup for existing email with wrong password");
                return Err(ApplicationError::authentication("Invalid email or password"));
            }
        }

        let mut new_user = NewUser::new(name, email, role);
        if !password.is_empty() {
            new_user = new_user.with_password(password);
        }
        let user = self.users.create_user(new_user)?;
        self.start_session(&user)
    }

    /// Act in a different role for the rest of the current session.
    ///
    /// Only the session's role snapshot changes; the stored user keeps its
    /// own role, and the next login starts from that again.
    pub fn switch_role(&self, role: Role) -> ApplicationResult<Session> {
        let key = self.gateway.keys().current_session.clone();
        let mut session: Session = self
            .gateway
            .load_optional(&key)
            .ok_or_else(|| ApplicationError::session("No active session"))?;

        if session.user_role == role {
            debug!(role = %role, "Role unchanged");
            return Ok(session);
        }

        info!(from = %session.user_role, to = %role, "Switching role");
        session.user_role = role;
        self.gateway.save(&key, &session)?;
        Ok(session)
    }
}
