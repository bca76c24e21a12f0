//! User Identity
//!
//! The stored user record and the defaults derived from a user's role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_core::Role;

/// Initial vault score of a freshly created founder
pub const FOUNDER_SIGNUP_POINTS: i64 = 10;

/// Per-user usage counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub posts: u32,
    pub connections: u32,
    pub investments: u32,
    pub mentorship_sessions: u32,
}

/// Stored user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Up to two uppercase initials
    pub avatar: String,
    /// Always within 0..=100
    pub vault_score: u8,
    pub created_at: DateTime<Utc>,
    pub bio: String,
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Plaintext; this data layer provides no credential security
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub stats: UserStats,
}

impl User {
    /// Build a record with role defaults filled in
    pub fn from_new(id: String, new_user: NewUser) -> Self {
        let role = new_user.role;
        Self {
            id,
            avatar: generate_avatar(&new_user.name),
            name: new_user.name,
            email: new_user.email,
            role,
            vault_score: if role == Role::Founder {
                FOUNDER_SIGNUP_POINTS as u8
            } else {
                0
            },
            created_at: new_user.created_at.unwrap_or_else(Utc::now),
            bio: default_bio(role),
            location: "Africa".to_string(),
            tags: default_tags(role),
            password: new_user.password,
            stats: UserStats::default(),
        }
    }

    /// Set the vault score, clamping into 0..=100
    pub fn set_vault_score(&mut self, score: i64) {
        self.vault_score = clamp_score(score);
    }

    /// Check a plaintext password. Users without a stored password accept any.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password.as_deref().map_or(true, |stored| stored == password)
    }

    pub fn display_string(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}

/// Fields supplied when creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
            password: None,
            created_at: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Derive the display name from the email's local part, capitalized
    pub fn from_email(email: &str, role: Role) -> Self {
        Self::new(name_from_email(email), email, role)
    }
}

/// Clamp any score into 0..=100
pub fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}

/// Initials of the whitespace-separated name parts, uppercased, at most two
pub fn generate_avatar(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub fn default_bio(role: Role) -> String {
    format!("{} at Vault Africa", role)
}

pub fn default_tags(role: Role) -> Vec<String> {
    let tags: &[&str] = match role {
        Role::Founder => &["Innovator", "Entrepreneur", "Startup", "African Founder"],
        Role::Investor => &["Angel Investor", "VC", "Funding", "Portfolio"],
        Role::Mentor => &["Advisor", "Expert", "Coach", "Industry Leader"],
    };
    tags.iter().map(|t| t.to_string()).collect()
}

pub fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Loose shape check: `something@something.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
