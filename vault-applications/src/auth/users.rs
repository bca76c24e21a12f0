//! User store
//!
//! CRUD over the stored user list. Lookups are linear scans; a miss is
//! `None`, never an error.

use super::identity::{NewUser, User, FOUNDER_SIGNUP_POINTS};
use crate::content::score::ScoreLedger;
use crate::ids::next_time_id;
use crate::storage::StorageGateway;
use crate::ApplicationResult;
use tracing::{debug, info};
use vault_core::Role;

#[derive(Debug, Clone)]
pub struct UserStore {
    gateway: StorageGateway,
}

impl UserStore {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    /// Create a user, or return the existing one when the email is taken.
    ///
    /// New founders also get their signup points recorded in the score
    /// history so that recomputing the score from history agrees with the
    /// stored default.
    pub fn create_user(&self, new_user: NewUser) -> ApplicationResult<User> {
        let key = self.gateway.keys().users.clone();
        let mut users: Vec<User> = self.gateway.load(&key);

        if let Some(existing) = users.iter().find(|u| u.email == new_user.email) {
            debug!("User already exists: {}", existing.name);
            return Ok(existing.clone());
        }

        let id = next_time_id("", |candidate| users.iter().any(|u| u.id == candidate));
        let user = User::from_new(id, new_user);
        users.push(user.clone());
        self.gateway.save(&key, &users)?;

        if user.role == Role::Founder {
            ScoreLedger::new(self.gateway.clone()).award(
                &user.id,
                FOUNDER_SIGNUP_POINTS,
                "signup",
            )?;
        }

        info!("User created: {}", user.display_string());
        Ok(user)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.all_users().into_iter().find(|u| u.email == email)
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Option<User> {
        self.all_users().into_iter().find(|u| u.id == user_id)
    }

    /// All users, or only those holding `role`, in creation order
    pub fn list_users(&self, role: Option<Role>) -> Vec<User> {
        self.all_users()
            .into_iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .collect()
    }

    /// Create a user named after the email's local part
    pub fn create_user_from_email(
        &self,
        email: &str,
        password: Option<&str>,
        role: Role,
    ) -> ApplicationResult<User> {
        let mut new_user = NewUser::from_email(email, role);
        new_user.password = password.map(str::to_string);
        self.create_user(new_user)
    }

    /// Replace the stored record that has the same id. Returns false when
    /// there is no such record.
    pub fn update_user(&self, user: &User) -> ApplicationResult<bool> {
        Ok(self
            .update_with(&user.id, |stored| *stored = user.clone())?
            .is_some())
    }

    /// Apply `f` to the stored user with `user_id` and persist the result.
    ///
    /// Returns `None` (and writes nothing) when no such user exists.
    pub fn update_with<F>(&self, user_id: &str, f: F) -> ApplicationResult<Option<User>>
    where
        F: FnOnce(&mut User),
    {
        let key = self.gateway.keys().users.clone();
        let mut users: Vec<User> = self.gateway.load(&key);

        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            debug!("Update skipped, user not found: {}", user_id);
            return Ok(None);
        };

        f(user);
        let updated = user.clone();
        self.gateway.save(&key, &users)?;
        Ok(Some(updated))
    }

    fn all_users(&self) -> Vec<User> {
        self.gateway.load(&self.gateway.keys().users)
    }
}
