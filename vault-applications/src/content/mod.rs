//! Content Store
//!
//! Posts, notifications, activities and vault scores, plus the actions that
//! touch several of them at once (publishing, endorsing, liking).
//!
//! Every mutation reads the whole affected collection, changes it and
//! writes it back. There is no locking; concurrent writers to the same
//! scope race last-write-wins.

pub mod activities;
pub mod notifications;
pub mod posts;
pub mod score;
pub mod types;

pub use activities::ActivityLog;
pub use notifications::{notification_icon, unread_badge, NotificationStore, DEFAULT_RECIPIENT};
pub use posts::PostStore;
pub use score::{score_category, ScoreEntry, ScoreLedger};
pub use types::*;

use crate::auth::{require, Action, User, UserStore, ViewContext};
use crate::storage::StorageGateway;
use crate::ApplicationResult;
use tracing::{debug, info};
use vault_core::Role;

/// Outcome of a successful endorsement
#[derive(Debug, Clone, PartialEq)]
pub struct Endorsement {
    pub post: Post,
    /// Sent to the post's author
    pub notification: Notification,
}

#[derive(Debug, Clone)]
pub struct ContentStore {
    posts: PostStore,
    notifications: NotificationStore,
    activities: ActivityLog,
    ledger: ScoreLedger,
    users: UserStore,
    endorsement_points: i64,
}

impl ContentStore {
    pub fn new(gateway: StorageGateway, users: UserStore, endorsement_points: i64) -> Self {
        Self {
            posts: PostStore::new(gateway.clone()),
            notifications: NotificationStore::new(gateway.clone()),
            activities: ActivityLog::new(gateway.clone()),
            ledger: ScoreLedger::new(gateway),
            users,
            endorsement_points,
        }
    }

    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn activities(&self) -> &ActivityLog {
        &self.activities
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    // ----- posts -----

    pub fn list_posts(&self, role: Option<Role>) -> Vec<Post> {
        self.posts.list_posts(role)
    }

    pub fn get_post(&self, post_id: &str) -> Option<Post> {
        self.posts.get_post(post_id)
    }

    /// Publish a post, log the activity and bump the author's post count.
    ///
    /// No role check happens here; gating publication is up to the caller.
    pub fn add_post(&self, input: NewPost) -> ApplicationResult<Post> {
        let post = self.posts.insert(input)?;

        self.activities.record_activity(NewActivity::new(
            post.author_id.clone(),
            "post_created",
            format!("Created a new post: {}", post.title),
        ))?;
        self.users
            .update_with(&post.author_id, |author| author.stats.posts += 1)?;

        info!(post_id = %post.id, author_id = %post.author_id, "Post added");
        Ok(post)
    }

    /// Endorse a post as `actor`.
    ///
    /// Founders are refused with a permission error before anything is
    /// read or written. A missing post yields `Ok(None)`.
    pub fn endorse_post(
        &self,
        actor: &ViewContext,
        post_id: &str,
    ) -> ApplicationResult<Option<Endorsement>> {
        require(actor.role, Action::EndorsePost)?;

        let Some(post) = self
            .posts
            .update_post(post_id, |post| post.stats.endorsements += 1)?
        else {
            return Ok(None);
        };

        let notification = self.notifications.add_notification(NewNotification::to_user(
            post.author_id.clone(),
            "Post Endorsed!",
            format!("{} endorsed your post \"{}\"", actor.display_name(), post.title),
            "endorsement",
        ))?;

        if let Some(author) = self.users.get_user_by_id(&post.author_id) {
            if author.role == Role::Founder {
                self.ledger
                    .award(&author.id, self.endorsement_points, "endorsement")?;
                self.calculate_vault_score(&author)?;
            }
        }

        info!(post_id = post_id, by = %actor.role, "Post endorsed");
        Ok(Some(Endorsement { post, notification }))
    }

    /// Count a share and return the text to share. `None` for a missing post.
    pub fn share_post(&self, post_id: &str) -> ApplicationResult<Option<String>> {
        let post = self.posts.update_post(post_id, |post| post.stats.shares += 1)?;
        Ok(post.map(|post| share_text(&post)))
    }

    /// Like or unlike; the post's like counter follows the set membership.
    /// `None` for a missing post, with the like set left untouched.
    pub fn toggle_like(&self, post_id: &str) -> ApplicationResult<Option<bool>> {
        if self.posts.get_post(post_id).is_none() {
            debug!(post_id = post_id, "Like skipped, post not found");
            return Ok(None);
        }

        let liked = self.posts.toggle_liked(post_id)?;
        self.posts.update_post(post_id, |post| {
            post.stats.likes = if liked {
                post.stats.likes.saturating_add(1)
            } else {
                post.stats.likes.saturating_sub(1)
            };
        })?;

        debug!(post_id = post_id, liked = liked, "Like toggled");
        Ok(Some(liked))
    }

    pub fn toggle_save_founder(&self, founder_id: &str) -> ApplicationResult<bool> {
        self.posts.toggle_saved(founder_id)
    }

    pub fn record_view(&self, post_id: &str) -> ApplicationResult<Option<Post>> {
        self.posts.update_post(post_id, |post| post.stats.views += 1)
    }

    pub fn liked_posts(&self) -> Vec<String> {
        self.posts.liked_posts()
    }

    pub fn saved_founders(&self) -> Vec<String> {
        self.posts.saved_founders()
    }

    // ----- notifications -----

    pub fn add_notification(&self, input: NewNotification) -> ApplicationResult<Notification> {
        self.notifications.add_notification(input)
    }

    pub fn notifications_for(&self, user_id: &str) -> Vec<Notification> {
        self.notifications.notifications_for(user_id)
    }

    pub fn mark_notification_read(&self, notification_id: &str) -> ApplicationResult<bool> {
        self.notifications.mark_notification_read(notification_id)
    }

    pub fn mark_all_read(&self, user_id: &str) -> ApplicationResult<usize> {
        self.notifications.mark_all_read(user_id)
    }

    pub fn count_unread(&self, user_id: &str) -> usize {
        self.notifications.count_unread(user_id)
    }

    // ----- activities -----

    pub fn list_activities(&self, role: Option<Role>) -> Vec<Activity> {
        self.activities.list_activities(role)
    }

    pub fn record_activity(&self, input: NewActivity) -> ApplicationResult<Activity> {
        self.activities.record_activity(input)
    }

    // ----- vault score -----

    pub fn award_points(&self, user_id: &str, points: i64, reason: &str) -> ApplicationResult<ScoreEntry> {
        self.ledger.award(user_id, points, reason)
    }

    /// Recompute a founder's score from history and store it if it moved.
    /// Other roles keep whatever score they were created with.
    pub fn calculate_vault_score(&self, user: &User) -> ApplicationResult<u8> {
        if user.role != Role::Founder {
            return Ok(user.vault_score);
        }

        let score = self.ledger.score_for(&user.id);
        if score != user.vault_score {
            debug!(user_id = %user.id, from = user.vault_score, to = score, "Vault score changed");
            self.users
                .update_with(&user.id, |stored| stored.vault_score = score)?;
        }
        Ok(score)
    }
}

/// Text offered when a post is shared
pub fn share_text(post: &Post) -> String {
    format!("Check out this innovation on Vault: \"{}\"", post.title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NewUser;
    use crate::storage::{MemoryStore, StorageKeys};
    use std::sync::Arc;

    fn content() -> (ContentStore, UserStore) {
        let gateway = StorageGateway::new(Arc::new(MemoryStore::new()), StorageKeys::default());
        let users = UserStore::new(gateway.clone());
        (ContentStore::new(gateway, users.clone(), 5), users)
    }

    #[test]
    fn test_add_post_counts_for_author() {
        let (content, users) = content();
        let author = users
            .create_user(NewUser::new("Amara", "a@x.com", Role::Founder))
            .unwrap();

        content
            .add_post(NewPost::titled("Hello", "World").by_author(&author.id, &author.name, &author.avatar))
            .unwrap();

        assert_eq!(users.get_user_by_id(&author.id).unwrap().stats.posts, 1);
        let activities = content.list_activities(None);
        assert_eq!(activities[0].kind, "post_created");
        assert_eq!(activities[0].user_id, author.id);
    }

    #[test]
    fn test_share_text() {
        let (content, _) = content();
        let post = content.add_post(NewPost::titled("FarmConnect", "")).unwrap();

        let text = content.share_post(&post.id).unwrap().unwrap();
        assert_eq!(text, "Check out this innovation on Vault: \"FarmConnect\"");
        assert_eq!(content.get_post(&post.id).unwrap().stats.shares, 1);
        assert!(content.share_post("post_missing").unwrap().is_none());
    }

    #[test]
    fn test_like_toggle_adjusts_count() {
        let (content, _) = content();
        let post = content.add_post(NewPost::default()).unwrap();

        assert_eq!(content.toggle_like(&post.id).unwrap(), Some(true));
        assert_eq!(content.get_post(&post.id).unwrap().stats.likes, 1);
        assert_eq!(content.toggle_like(&post.id).unwrap(), Some(false));
        assert_eq!(content.get_post(&post.id).unwrap().stats.likes, 0);
    }

    #[test]
    fn test_like_missing_post_changes_nothing() {
        let (content, _) = content();

        assert_eq!(content.toggle_like("post_does_not_exist").unwrap(), None);
        assert!(content.liked_posts().is_empty());
    }

    #[test]
    fn test_endorsement_awards_founder() {
        let (content, users) = content();
        let author = users
            .create_user(NewUser::new("Amara", "a@x.com", Role::Founder))
            .unwrap();
        let post = content
            .add_post(NewPost::default().by_author(&author.id, &author.name, &author.avatar))
            .unwrap();

        let investor = users
            .create_user(NewUser::new("Kofi", "k@x.com", Role::Investor))
            .unwrap();
        content
            .endorse_post(&ViewContext::for_user(investor), &post.id)
            .unwrap()
            .unwrap();

        assert_eq!(users.get_user_by_id(&author.id).unwrap().vault_score, 15);
        let inbox = content.notifications_for(&author.id);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, "endorsement");
        assert_eq!(inbox[0].message, "Kofi endorsed your post \"New Post\"");
    }

    #[test]
    fn test_non_founder_score_is_fixed() {
        let (content, users) = content();
        let mentor = users
            .create_user(NewUser::new("M", "m@x.com", Role::Mentor))
            .unwrap();
        content.award_points(&mentor.id, 50, "bonus").unwrap();

        assert_eq!(content.calculate_vault_score(&mentor).unwrap(), 0);
    }
}
