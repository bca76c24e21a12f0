//! Post store, with the like and saved-founder sets

use super::types::{normalize_visibility, NewPost, Post, PostStats};
use crate::ids::next_time_id;
use crate::storage::StorageGateway;
use crate::ApplicationResult;
use chrono::Utc;
use tracing::debug;
use vault_core::Role;

#[derive(Debug, Clone)]
pub struct PostStore {
    gateway: StorageGateway,
}

impl PostStore {
    pub fn new(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    /// Posts visible to `role`, or all of them, in stored order
    pub fn list_posts(&self, role: Option<Role>) -> Vec<Post> {
        let posts = self.all();
        match role {
            Some(role) => posts.into_iter().filter(|p| p.is_visible_to(role)).collect(),
            None => posts,
        }
    }

    pub fn get_post(&self, post_id: &str) -> Option<Post> {
        self.all().into_iter().find(|p| p.id == post_id)
    }

    /// Build a post from `input` and put it first
    pub fn insert(&self, input: NewPost) -> ApplicationResult<Post> {
        let key = self.gateway.keys().posts.clone();
        let mut posts: Vec<Post> = self.gateway.load(&key);

        let post = Post {
            id: next_time_id("post_", |id| posts.iter().any(|p| p.id == id)),
            author_id: input.author_id.unwrap_or_else(|| "current_user".to_string()),
            author_name: input.author_name.unwrap_or_else(|| "User".to_string()),
            author_avatar: input.author_avatar.unwrap_or_else(|| "UU".to_string()),
            title: input.title.unwrap_or_else(|| "New Post".to_string()),
            content: input.content.unwrap_or_default(),
            category: input.category.unwrap_or_else(|| "General".to_string()),
            tags: input.tags,
            role_visible: Some(normalize_visibility(input.role_visible.unwrap_or_default())),
            timestamp: Utc::now(),
            stats: PostStats::default(),
        };

        posts.insert(0, post.clone());
        self.gateway.save(&key, &posts)?;
        Ok(post)
    }

    /// Apply `f` to the post and persist. `None` when the post does not exist.
    pub fn update_post<F>(&self, post_id: &str, f: F) -> ApplicationResult<Option<Post>>
    where
        F: FnOnce(&mut Post),
    {
        let key = self.gateway.keys().posts.clone();
        let mut posts: Vec<Post> = self.gateway.load(&key);

        let Some(post) = posts.iter_mut().find(|p| p.id == post_id) else {
            debug!(post_id = post_id, "Post not found");
            return Ok(None);
        };

        f(post);
        let updated = post.clone();
        self.gateway.save(&key, &posts)?;
        Ok(Some(updated))
    }

    /// Overwrite the whole collection
    pub fn replace_all(&self, posts: &[Post]) -> ApplicationResult<()> {
        Ok(self.gateway.save(&self.gateway.keys().posts, posts)?)
    }

    pub fn liked_posts(&self) -> Vec<String> {
        self.gateway.load(&self.gateway.keys().likes)
    }

    pub fn saved_founders(&self) -> Vec<String> {
        self.gateway.load(&self.gateway.keys().saved_founders)
    }

    /// Flip membership of `post_id` in the like set; returns the new state
    pub fn toggle_liked(&self, post_id: &str) -> ApplicationResult<bool> {
        let key = self.gateway.keys().likes.clone();
        Ok(self.gateway.update(&key, |set: &mut Vec<String>| toggle_member(set, post_id))?)
    }

    /// Flip membership of `founder_id` in the saved set; returns the new state
    pub fn toggle_saved(&self, founder_id: &str) -> ApplicationResult<bool> {
        let key = self.gateway.keys().saved_founders.clone();
        Ok(self
            .gateway
            .update(&key, |set: &mut Vec<String>| toggle_member(set, founder_id))?)
    }

    fn all(&self) -> Vec<Post> {
        self.gateway.load(&self.gateway.keys().posts)
    }
}

fn toggle_member(set: &mut Vec<String>, member: &str) -> bool {
    if let Some(pos) = set.iter().position(|m| m == member) {
        set.remove(pos);
        false
    } else {
        set.push(member.to_string());
        true
    }
}
