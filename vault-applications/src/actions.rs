//! Page actions
//!
//! The flat callback surface a page binds its buttons to: identifiers and
//! role strings in, a success flag out. Nothing here fails loudly. Refused
//! or invalid actions are logged, reported as an error notice on the event
//! channel, and return `false` with no state changed.

use crate::content::NewPost;
use crate::events::DataEvent;
use crate::{ApplicationResult, VaultApplication};
use vault_core::Role;

pub struct PageActions<'a> {
    app: &'a VaultApplication,
}

impl<'a> PageActions<'a> {
    pub fn new(app: &'a VaultApplication) -> Self {
        Self { app }
    }

    pub fn login(&self, email: &str, password: &str, role: &str) -> bool {
        let Some(role) = self.parse_role(role) else {
            return false;
        };
        self.settle(self.app.login(email, password, role), |session| {
            Some(format!("Welcome back, {}!", session.user_name))
        })
    }

    pub fn signup(&self, name: &str, email: &str, password: &str, role: &str) -> bool {
        let Some(role) = self.parse_role(role) else {
            return false;
        };
        self.settle(self.app.signup(name, email, password, role), |session| {
            Some(format!("Welcome to Vault, {}!", session.user_name))
        })
    }

    pub fn logout(&self) -> bool {
        self.settle(self.app.logout(), |ended| {
            ended.then(|| "Logged out".to_string())
        })
    }

    pub fn switch_role(&self, role: &str) -> bool {
        let Some(role) = self.parse_role(role) else {
            return false;
        };
        self.settle(self.app.switch_role(role), |session| {
            Some(format!("Switched to {} dashboard", session.user_role))
        })
    }

    pub fn create_post(&self, title: &str, content: &str) -> bool {
        self.settle(self.app.add_post(NewPost::titled(title, content)), |_| {
            Some("Post published!".to_string())
        })
    }

    /// Toggle the like; false when the post does not exist
    pub fn like_post(&self, post_id: &str) -> bool {
        self.settle_found(self.app.toggle_like(post_id), |liked| {
            Some(if *liked { "Post liked!" } else { "Post unliked" }.to_string())
        })
    }

    pub fn save_founder(&self, founder_id: &str) -> bool {
        self.settle(self.app.toggle_save_founder(founder_id), |saved| {
            Some(
                if *saved {
                    "Founder saved!"
                } else {
                    "Founder removed from saved"
                }
                .to_string(),
            )
        })
    }

    /// False when refused or when the post does not exist
    pub fn endorse_post(&self, post_id: &str) -> bool {
        self.settle_found(self.app.endorse_post(post_id), |_| {
            Some("Post endorsed!".to_string())
        })
    }

    pub fn share_post(&self, post_id: &str) -> bool {
        self.settle_found(self.app.share_post(post_id), |text| Some(text.clone()))
    }

    pub fn mark_notification_read(&self, notification_id: &str) -> bool {
        let found = self
            .app
            .mark_notification_read(notification_id)
            .map(|found| found.then_some(()));
        self.settle_found(found, |_| None)
    }

    pub fn toggle_theme(&self) -> bool {
        self.settle(self.app.toggle_theme(), |_| None)
    }

    pub fn reset_demo_data(&self) -> bool {
        self.settle(self.app.reset_demo_data(), |_| {
            Some("Demo data reset".to_string())
        })
    }

    fn parse_role(&self, role: &str) -> Option<Role> {
        match role.parse::<Role>() {
            Ok(role) => Some(role),
            Err(message) => {
                tracing::warn!(role = role, "Rejected unknown role");
                self.app.emit(DataEvent::error(message));
                None
            }
        }
    }

    /// Degrade an outcome to a flag, emitting the notice that goes with it
    fn settle<T>(
        &self,
        result: ApplicationResult<T>,
        notice: impl FnOnce(&T) -> Option<String>,
    ) -> bool {
        match result {
            Ok(value) => {
                if let Some(message) = notice(&value) {
                    self.app.emit(DataEvent::success(message));
                }
                true
            }
            Err(e) => {
                e.log();
                if e.is_user_facing() {
                    self.app.emit(DataEvent::error(e.user_message()));
                }
                false
            }
        }
    }

    /// Like `settle`, but a missing target also counts as failure
    fn settle_found<T>(
        &self,
        result: ApplicationResult<Option<T>>,
        notice: impl FnOnce(&T) -> Option<String>,
    ) -> bool {
        match result {
            Ok(None) => {
                tracing::debug!("Action target not found");
                false
            }
            other => self.settle(other, |found| found.as_ref().and_then(notice)),
        }
    }
}
