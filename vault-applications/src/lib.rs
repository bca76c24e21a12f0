//! Vault Applications - users, sessions, content and views
//!
//! The application layer of the Vault Africa data layer, built on the
//! storage scope abstraction from vault-core:
//!
//! - Storage gateway with typed JSON collections
//! - Users, sessions and role permissions
//! - Posts, notifications, activities and vault scores
//! - Role-scoped view composition
//!
//! ## Architecture
//!
//! - **Core** (vault-core): errors, config, logging, the backend trait
//! - **Applications** (this crate): stores and the [`VaultApplication`] facade
//! - **Presentation** (vault-cli): operator interface

pub mod actions;
pub mod auth;
pub mod content;
pub mod demo;
pub mod events;
pub mod ids;
pub mod preferences;
pub mod session;
pub mod storage;
pub mod view;

pub use actions::PageActions;
pub use auth::{Action, NewUser, User, UserStats, UserStore, ViewContext};
pub use content::{
    score_category, Activity, ContentStore, Endorsement, NewActivity, NewNotification, NewPost,
    Notification, Post, PostStats, ScoreEntry,
};
pub use events::{DataEvent, NoticeLevel};
pub use preferences::Preferences;
pub use session::{Session, SessionManager};
pub use storage::{Fetched, StorageGateway, StorageKeys};
pub use view::{compose, format_time_ago, Section, ViewData, ViewFragment};

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use vault_core::performance::measure_sync;
use vault_core::{KeyValueStore, Role, Theme, VaultConfig, VaultError};

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Core error: {0}")]
    Core(#[from] VaultError),

    #[error("Permission error: {message}")]
    Permission { message: String },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl ApplicationError {
    /// Create a permission error
    pub fn permission<S: Into<String>>(message: S) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a session error
    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Whether the message is meant to be shown to the user as-is
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ApplicationError::Permission { .. }
                | ApplicationError::Authentication { .. }
                | ApplicationError::Session { .. }
                | ApplicationError::NotFound { .. }
                | ApplicationError::Core(VaultError::Validation { .. })
        )
    }

    /// Message for the user, without the category prefix
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::Permission { message }
            | ApplicationError::Authentication { message }
            | ApplicationError::Session { message }
            | ApplicationError::NotFound { message } => message.clone(),
            ApplicationError::Core(VaultError::Validation { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Log at a level matching the severity
    pub fn log(&self) {
        match self {
            ApplicationError::Core(inner) => inner.log(),
            ApplicationError::Permission { .. }
            | ApplicationError::Authentication { .. }
            | ApplicationError::Session { .. } => warn!(error = %self, "Action refused"),
            ApplicationError::NotFound { .. } => debug!(error = %self, "Lookup missed"),
            ApplicationError::Io(_) | ApplicationError::Serialization(_) => {
                error!(error = %self, "Application failure")
            }
        }
    }
}

/// Main Vault application service
///
/// Wires the stores over one storage scope and broadcasts a [`DataEvent`]
/// after every completed mutation.
pub struct VaultApplication {
    config: VaultConfig,
    gateway: StorageGateway,
    users: UserStore,
    sessions: SessionManager,
    content: ContentStore,
    preferences: Preferences,
    events: broadcast::Sender<DataEvent>,
}

/// Builder for VaultApplication
pub struct VaultApplicationBuilder {
    config: VaultConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    events: Option<broadcast::Sender<DataEvent>>,
}

impl VaultApplicationBuilder {
    pub fn new(config: VaultConfig) -> Self {
        Self {
            config,
            store: None,
            events: None,
        }
    }

    /// Use an existing backend instead of opening the configured one.
    /// Applications built over the same backend share one storage scope.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Broadcast on an existing channel, so receivers subscribed before
    /// `build` also see [`DataEvent::Ready`]
    pub fn with_events(mut self, events: broadcast::Sender<DataEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> ApplicationResult<VaultApplication> {
        let config = self.config;
        config.validate()?;

        let store = match self.store {
            Some(store) => store,
            None => storage::open_store(&config.storage)?,
        };
        let events = self
            .events
            .unwrap_or_else(|| broadcast::channel(events::EVENT_BUFFER).0);

        let gateway = StorageGateway::new(store, StorageKeys::new(&config.storage.key_prefix));
        let users = UserStore::new(gateway.clone());
        let sessions = SessionManager::new(
            gateway.clone(),
            users.clone(),
            config.session.token_prefix.clone(),
        );
        let content = ContentStore::new(
            gateway.clone(),
            users.clone(),
            config.content.endorsement_points,
        );
        let preferences = Preferences::new(gateway.clone());

        if config.content.seed_demo_data {
            demo::seed_if_needed(&gateway)?;
        }

        info!(
            prefix = %config.storage.key_prefix,
            backend = ?config.storage.backend,
            "Vault application ready"
        );

        let app = VaultApplication {
            config,
            gateway,
            users,
            sessions,
            content,
            preferences,
            events,
        };
        app.emit(DataEvent::Ready);
        Ok(app)
    }
}

impl VaultApplication {
    /// Open the storage scope described by `config`
    pub fn new(config: VaultConfig) -> ApplicationResult<Self> {
        VaultApplicationBuilder::new(config).build()
    }

    /// Build over an existing backend
    pub fn with_store(config: VaultConfig, store: Arc<dyn KeyValueStore>) -> ApplicationResult<Self> {
        VaultApplicationBuilder::new(config).with_store(store).build()
    }

    /// Create a builder for more advanced configuration
    pub fn builder(config: VaultConfig) -> VaultApplicationBuilder {
        VaultApplicationBuilder::new(config)
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Receive every event emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<DataEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: DataEvent) {
        debug!(?event, "Emitting data event");
        // no receivers is fine
        let _ = self.events.send(event);
    }

    // ========================================
    // Session API
    // ========================================

    pub fn signup(&self, name: &str, email: &str, password: &str, role: Role) -> ApplicationResult<Session> {
        let session = self.sessions.signup(name, email, password, role)?;
        self.emit_session_started(&session);
        Ok(session)
    }

    pub fn login(&self, email: &str, password: &str, role: Role) -> ApplicationResult<Session> {
        let session = self.sessions.login(email, password, role)?;
        self.emit_session_started(&session);
        Ok(session)
    }

    pub fn logout(&self) -> ApplicationResult<bool> {
        let ended = self.sessions.end_session()?;
        if ended {
            self.emit(DataEvent::SessionEnded);
        }
        Ok(ended)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.sessions.current_session()
    }

    pub fn current_user(&self) -> Option<User> {
        self.sessions.current_user()
    }

    pub fn is_logged_in(&self) -> bool {
        self.sessions.is_logged_in()
    }

    pub fn session_history(&self) -> Vec<Session> {
        self.sessions.session_history()
    }

    pub fn switch_role(&self, role: Role) -> ApplicationResult<Session> {
        let before = self.sessions.current_session().map(|s| s.user_role);
        let session = self.sessions.switch_role(role)?;
        if let Some(from) = before.filter(|from| *from != role) {
            self.emit(DataEvent::RoleSwitched { from, to: role });
        }
        Ok(session)
    }

    /// Who is acting, in which role.
    ///
    /// Signed in: the session's role and the stored user. Otherwise an
    /// anonymous founder.
    pub fn view_context(&self) -> ViewContext {
        match self.sessions.current_session() {
            Some(session) => {
                let user = self.users.get_user_by_id(&session.user_id);
                ViewContext::from_session(&session, user)
            }
            None => ViewContext::default(),
        }
    }

    fn emit_session_started(&self, session: &Session) {
        self.emit(DataEvent::SessionStarted {
            user_id: session.user_id.clone(),
            role: session.user_role,
        });
    }

    // ========================================
    // Content API
    // ========================================

    /// Publish a post as the current user; only founders may publish
    pub fn add_post(&self, input: NewPost) -> ApplicationResult<Post> {
        let ctx = self.view_context();
        let Some(user) = &ctx.user else {
            return Err(ApplicationError::session("Sign in to publish"));
        };
        auth::require(ctx.role, Action::CreatePost)?;

        let input = NewPost {
            author_id: Some(user.id.clone()),
            author_name: Some(user.name.clone()),
            author_avatar: Some(user.avatar.clone()),
            ..input
        };

        let post = self.content.add_post(input)?;
        self.emit(DataEvent::PostAdded {
            post_id: post.id.clone(),
        });
        Ok(post)
    }

    pub fn list_posts(&self) -> Vec<Post> {
        self.content.list_posts(Some(self.view_context().role))
    }

    /// Endorse as the current context. `Ok(None)` when the post is missing.
    pub fn endorse_post(&self, post_id: &str) -> ApplicationResult<Option<Endorsement>> {
        let ctx = self.view_context();
        let endorsement = self.content.endorse_post(&ctx, post_id)?;
        if let Some(endorsement) = &endorsement {
            self.emit(DataEvent::PostUpdated {
                post_id: endorsement.post.id.clone(),
            });
            self.emit(DataEvent::NotificationAdded {
                notification_id: endorsement.notification.id.clone(),
                user_id: endorsement.notification.user_id.clone(),
            });
        }
        Ok(endorsement)
    }

    pub fn share_post(&self, post_id: &str) -> ApplicationResult<Option<String>> {
        let text = self.content.share_post(post_id)?;
        if text.is_some() {
            self.emit(DataEvent::PostUpdated {
                post_id: post_id.to_string(),
            });
        }
        Ok(text)
    }

    /// Like or unlike as the current context. `Ok(None)` when the post is missing.
    pub fn toggle_like(&self, post_id: &str) -> ApplicationResult<Option<bool>> {
        let liked = self.content.toggle_like(post_id)?;
        if liked.is_some() {
            self.emit(DataEvent::PostUpdated {
                post_id: post_id.to_string(),
            });
        }
        Ok(liked)
    }

    /// Bookmark or un-bookmark a founder; investors and mentors only
    pub fn toggle_save_founder(&self, founder_id: &str) -> ApplicationResult<bool> {
        auth::require(self.view_context().role, Action::SaveFounder)?;
        let saved = self.content.toggle_save_founder(founder_id)?;
        self.emit(DataEvent::SavedFoundersChanged {
            founder_id: founder_id.to_string(),
            saved,
        });
        Ok(saved)
    }

    pub fn record_view(&self, post_id: &str) -> ApplicationResult<Option<Post>> {
        self.content.record_view(post_id)
    }

    // ========================================
    // Notifications & activities
    // ========================================

    /// Id notifications are addressed to for the current context
    pub fn recipient_id(&self) -> String {
        self.sessions
            .current_session()
            .map(|s| s.user_id)
            .unwrap_or_else(|| content::DEFAULT_RECIPIENT.to_string())
    }

    pub fn add_notification(&self, input: NewNotification) -> ApplicationResult<Notification> {
        let input = NewNotification {
            user_id: input.user_id.or_else(|| Some(self.recipient_id())),
            ..input
        };
        let notification = self.content.add_notification(input)?;
        self.emit(DataEvent::NotificationAdded {
            notification_id: notification.id.clone(),
            user_id: notification.user_id.clone(),
        });
        Ok(notification)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.content.notifications_for(&self.recipient_id())
    }

    pub fn unread_count(&self) -> usize {
        self.content.count_unread(&self.recipient_id())
    }

    pub fn mark_notification_read(&self, notification_id: &str) -> ApplicationResult<bool> {
        let found = self.content.mark_notification_read(notification_id)?;
        if found {
            self.emit(DataEvent::NotificationRead {
                notification_id: notification_id.to_string(),
            });
        }
        Ok(found)
    }

    pub fn mark_all_read(&self) -> ApplicationResult<usize> {
        let changed = self.content.mark_all_read(&self.recipient_id())?;
        if changed > 0 {
            self.emit(DataEvent::NotificationRead {
                notification_id: "*".to_string(),
            });
        }
        Ok(changed)
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.content.list_activities(Some(self.view_context().role))
    }

    /// Current user's vault score, recomputed from history
    pub fn vault_score(&self) -> ApplicationResult<Option<u8>> {
        match self.current_user() {
            Some(user) => Ok(Some(self.content.calculate_vault_score(&user)?)),
            None => Ok(None),
        }
    }

    // ========================================
    // Preferences & demo data
    // ========================================

    pub fn theme(&self) -> Theme {
        self.preferences.theme()
    }

    pub fn set_theme(&self, theme: Theme) -> ApplicationResult<()> {
        self.preferences.set_theme(theme)?;
        self.emit(DataEvent::ThemeChanged { theme });
        Ok(())
    }

    pub fn toggle_theme(&self) -> ApplicationResult<Theme> {
        let theme = self.preferences.toggle_theme()?;
        self.emit(DataEvent::ThemeChanged { theme });
        Ok(theme)
    }

    pub fn reset_demo_data(&self) -> ApplicationResult<()> {
        demo::reset(&self.gateway)?;
        self.emit(DataEvent::DemoDataReset);
        Ok(())
    }

    // ========================================
    // Views
    // ========================================

    /// Snapshot of everything the composer needs for `ctx`
    pub fn view_data(&self, ctx: &ViewContext) -> ViewData {
        let recipient = ctx
            .user_id()
            .map_or_else(|| content::DEFAULT_RECIPIENT.to_string(), str::to_string);
        ViewData {
            posts: self.content.list_posts(Some(ctx.role)),
            liked_posts: self.content.liked_posts(),
            saved_founders: self.content.saved_founders(),
            founders: self.users.list_users(Some(Role::Founder)),
            unread_count: self.content.count_unread(&recipient),
            now: chrono::Utc::now(),
        }
    }

    /// Compose `section` for the current context
    pub fn compose_view(&self, section: Section) -> ViewFragment {
        let ctx = self.view_context();
        self.compose_view_for(&ctx, section)
    }

    /// Compose `section` for an explicit context
    pub fn compose_view_for(&self, ctx: &ViewContext, section: Section) -> ViewFragment {
        let data = self.view_data(ctx);
        measure_sync("compose_view", || view::compose(ctx, section, &data))
    }
}
