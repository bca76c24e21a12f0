//! Activity log

use super::types::{normalize_visibility, Activity, NewActivity};
use crate::ids::next_time_id;
use crate::storage::StorageGateway;
use crate::ApplicationResult;
use chrono::Utc;
use tracing::debug;
use vault_core::Role;

#[derive(Debug, Clone)]
pub struct ActivityLog {
    gateway: StorageGateway,
}

impl ActivityLog {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    /// Activities visible to `role`, or all of them, newest first
    pub fn list_activities(&self, role: Option<Role>) -> Vec<Activity> {
        let activities: Vec<Activity> = self.gateway.load(&self.gateway.keys().activities);
        match role {
            Some(role) => activities
                .into_iter()
                .filter(|a| a.is_visible_to(role))
                .collect(),
            None => activities,
        }
    }

    pub fn record_activity(&self, input: NewActivity) -> ApplicationResult<Activity> {
        let key = self.gateway.keys().activities.clone();
        let mut activities: Vec<Activity> = self.gateway.load(&key);

        let activity = Activity {
            id: next_time_id("activity_", |id| activities.iter().any(|a| a.id == id)),
            user_id: input.user_id,
            kind: input.kind,
            content: input.content,
            timestamp: Utc::now(),
            role_visible: input.role_visible.map(normalize_visibility),
        };

        activities.insert(0, activity.clone());
        self.gateway.save(&key, &activities)?;

        debug!(activity_id = %activity.id, kind = %activity.kind, "Activity recorded");
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageKeys};
    use std::sync::Arc;

    fn log() -> ActivityLog {
        ActivityLog::new(StorageGateway::new(
            Arc::new(MemoryStore::new()),
            StorageKeys::default(),
        ))
    }

    #[test]
    fn test_filter_by_role() {
        let log = log();
        log.record_activity(NewActivity::new("u1", "investment_made", "Invested").visible_to(vec![Role::Investor]))
            .unwrap();
        log.record_activity(NewActivity::new("u2", "post_created", "Posted"))
            .unwrap();

        assert_eq!(log.list_activities(Some(Role::Founder)).len(), 1);
        assert_eq!(log.list_activities(Some(Role::Investor)).len(), 2);
        assert_eq!(log.list_activities(None).len(), 2);
    }

    #[test]
    fn test_newest_first() {
        let log = log();
        log.record_activity(NewActivity::new("u1", "a", "first")).unwrap();
        log.record_activity(NewActivity::new("u1", "b", "second")).unwrap();

        let activities = log.list_activities(None);
        assert_eq!(activities[0].content, "second");
        assert_ne!(activities[0].id, activities[1].id);
    }
}
