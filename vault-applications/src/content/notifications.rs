//! Notification store

use super::types::{NewNotification, Notification};
use crate::ids::next_time_id;
use crate::storage::StorageGateway;
use crate::ApplicationResult;
use chrono::Utc;
use tracing::{debug, info};

/// Recipient used when a notification names no user
pub const DEFAULT_RECIPIENT: &str = "current_user";

/// Icon class for a notification type; unknown types get the info icon
pub fn notification_icon(kind: &str) -> &'static str {
    match kind {
        "welcome" => "fas fa-party-horn",
        "connection" => "fas fa-user-plus",
        "investment" => "fas fa-handshake",
        "mentorship" => "fas fa-hands-helping",
        "post" => "fas fa-newspaper",
        "comment" => "fas fa-comment",
        "like" => "fas fa-thumbs-up",
        "endorsement" => "fas fa-star",
        "course" => "fas fa-graduation-cap",
        "warning" => "fas fa-exclamation-triangle",
        "success" => "fas fa-check-circle",
        "error" => "fas fa-exclamation-circle",
        _ => "fas fa-info-circle",
    }
}

/// Badge text for an unread count
pub fn unread_badge(count: usize) -> String {
    if count > 99 {
        "99+".to_string()
    } else {
        count.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct NotificationStore {
    gateway: StorageGateway,
}

impl NotificationStore {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    /// Prepend a notification, filling defaults
    pub fn add_notification(&self, input: NewNotification) -> ApplicationResult<Notification> {
        let key = self.gateway.keys().notifications.clone();
        let mut notifications: Vec<Notification> = self.gateway.load(&key);

        let kind = input.kind.unwrap_or_else(|| "info".to_string());
        let notification = Notification {
            id: next_time_id("notif_", |id| notifications.iter().any(|n| n.id == id)),
            user_id: input
                .user_id
                .unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),
            title: input.title.unwrap_or_else(|| "Notification".to_string()),
            message: input.message.unwrap_or_default(),
            icon: notification_icon(&kind).to_string(),
            kind,
            unread: input.unread != Some(false),
            timestamp: Utc::now(),
        };

        notifications.insert(0, notification.clone());
        self.gateway.save(&key, &notifications)?;

        info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = %notification.kind,
            "Notification added"
        );
        Ok(notification)
    }

    /// Newest first
    pub fn notifications_for(&self, user_id: &str) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect()
    }

    /// Mark one notification read.
    ///
    /// Returns true whenever the notification exists, including when it was
    /// already read; in that case nothing is written.
    pub fn mark_notification_read(&self, notification_id: &str) -> ApplicationResult<bool> {
        let key = self.gateway.keys().notifications.clone();
        let mut notifications: Vec<Notification> = self.gateway.load(&key);

        let Some(notification) = notifications.iter_mut().find(|n| n.id == notification_id) else {
            debug!(notification_id = notification_id, "Notification not found");
            return Ok(false);
        };

        if notification.unread {
            notification.unread = false;
            self.gateway.save(&key, &notifications)?;
        }
        Ok(true)
    }

    /// Mark every notification of `user_id` read; returns how many changed
    pub fn mark_all_read(&self, user_id: &str) -> ApplicationResult<usize> {
        let key = self.gateway.keys().notifications.clone();
        let mut notifications: Vec<Notification> = self.gateway.load(&key);

        let mut changed = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && n.unread)
        {
            notification.unread = false;
            changed += 1;
        }

        if changed > 0 {
            self.gateway.save(&key, &notifications)?;
        }
        Ok(changed)
    }

    pub fn count_unread(&self, user_id: &str) -> usize {
        self.all()
            .iter()
            .filter(|n| n.user_id == user_id && n.unread)
            .count()
    }

    fn all(&self) -> Vec<Notification> {
        self.gateway.load(&self.gateway.keys().notifications)
    }
}
