//! View fragment types
//!
//! Structured, serializable output of the composer. Rendering these into
//! markup or terminal text is the caller's business.

use crate::auth::User;
use crate::content::Post;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vault_core::Role;

/// Dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Overview,
    Feed,
    Discover,
    Profile,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Feed,
        Section::Discover,
        Section::Profile,
    ];

    /// Unknown names fall back to the overview
    pub fn parse_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Overview => write!(f, "overview"),
            Section::Feed => write!(f, "feed"),
            Section::Discover => write!(f, "discover"),
            Section::Profile => write!(f, "profile"),
        }
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overview" => Ok(Section::Overview),
            "feed" => Ok(Section::Feed),
            "discover" => Ok(Section::Discover),
            "profile" => Ok(Section::Profile),
            _ => Err(format!("Unknown section: {}", s)),
        }
    }
}

/// Everything the composer reads besides the context
#[derive(Debug, Clone)]
pub struct ViewData {
    pub posts: Vec<Post>,
    pub liked_posts: Vec<String>,
    pub saved_founders: Vec<String>,
    /// Stored users with the founder role
    pub founders: Vec<User>,
    pub unread_count: usize,
    pub now: DateTime<Utc>,
}

impl Default for ViewData {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            liked_posts: Vec::new(),
            saved_founders: Vec::new(),
            founders: Vec::new(),
            unread_count: 0,
            now: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum ViewFragment {
    Overview(OverviewView),
    Feed(FeedView),
    Discover(DiscoverView),
    Profile(ProfileView),
}

impl ViewFragment {
    pub fn section(&self) -> Section {
        match self {
            ViewFragment::Overview(_) => Section::Overview,
            ViewFragment::Feed(_) => Section::Feed,
            ViewFragment::Discover(_) => Section::Discover,
            ViewFragment::Profile(_) => Section::Profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCard {
    pub icon: String,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub title: String,
    pub detail: String,
    pub action: String,
}

/// Role-specific board under the stat cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverviewPanel {
    Pipeline { title: String, stages: Vec<Stage> },
    DealFlow { title: String, stages: Vec<Stage> },
    MentorshipQueue { title: String, items: Vec<QueueItem> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAction {
    /// Stable identifier a front end can dispatch on
    pub id: String,
    pub label: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewView {
    pub role: Role,
    pub banner: Banner,
    pub stats: Vec<StatCard>,
    pub panel: OverviewPanel,
    pub quick_actions: Vec<QuickAction>,
    pub unread_badge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub post: Post,
    pub liked: bool,
    pub time_ago: String,
    pub can_endorse: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedView {
    pub role: Role,
    pub can_post: bool,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectCard {
    pub icon: String,
    pub title: String,
    pub description: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCard {
    pub id: String,
    pub name: String,
    pub avatar: String,
    /// Sector, stage or location line
    pub headline: String,
    pub vault_score: u8,
    pub tags: Vec<String>,
    pub saved: bool,
    /// Canned demo candidate rather than a stored founder
    pub demo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscoverContent {
    /// Founders look for investors and mentors
    Connect { cards: Vec<ConnectCard> },
    /// Investors and mentors look at founders
    Candidates {
        cards: Vec<CandidateCard>,
        action: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverView {
    pub role: Role,
    pub title: String,
    pub content: DiscoverContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub name: String,
    pub avatar: String,
    pub role: Role,
    pub role_label: String,
    pub location: String,
    pub about: String,
    pub tags: Vec<String>,
    pub stats: Vec<ProfileStat>,
    /// Founders only
    pub score_category: Option<String>,
}
