//! Fixed storage keys of one scope

/// Every collection key used by the data layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub users: String,
    pub sessions: String,
    pub current_session: String,
    pub posts: String,
    pub notifications: String,
    pub activities: String,
    pub likes: String,
    pub saved_founders: String,
    pub theme: String,
    pub score_history: String,
}

impl StorageKeys {
    pub fn new(prefix: &str) -> Self {
        let key = |name: &str| format!("{}_{}", prefix, name);
        Self {
            users: key("users"),
            sessions: key("sessions"),
            current_session: key("current_session"),
            posts: key("posts"),
            notifications: key("notifications"),
            activities: key("activities"),
            likes: key("likes"),
            saved_founders: key("saved_founders"),
            theme: key("theme"),
            score_history: key("score_history"),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("vault")
    }
}
