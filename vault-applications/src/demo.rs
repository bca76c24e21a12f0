//! Demo content
//!
//! Three posts, three notifications and three activities, timestamped
//! relative to the moment they are written.

use crate::content::{notification_icon, Activity, Notification, Post, PostStats, DEFAULT_RECIPIENT};
use crate::storage::StorageGateway;
use crate::ApplicationResult;
use chrono::{DateTime, Duration, Utc};
use tracing::info;
use vault_core::Role;

/// Write each demo collection whose key is absent; returns how many were written
pub fn seed_if_needed(gateway: &StorageGateway) -> ApplicationResult<usize> {
    let keys = gateway.keys();
    let now = Utc::now();
    let mut seeded = 0;

    if !gateway.contains(&keys.posts)? {
        gateway.save(&keys.posts, &demo_posts(now))?;
        seeded += 1;
    }
    if !gateway.contains(&keys.notifications)? {
        gateway.save(&keys.notifications, &demo_notifications(now))?;
        seeded += 1;
    }
    if !gateway.contains(&keys.activities)? {
        gateway.save(&keys.activities, &demo_activities(now))?;
        seeded += 1;
    }

    if seeded > 0 {
        info!(collections = seeded, "Seeded demo data");
    }
    Ok(seeded)
}

/// Overwrite posts, notifications and activities with fresh demo content
pub fn reset(gateway: &StorageGateway) -> ApplicationResult<()> {
    let keys = gateway.keys();
    let now = Utc::now();

    gateway.save(&keys.posts, &demo_posts(now))?;
    gateway.save(&keys.notifications, &demo_notifications(now))?;
    gateway.save(&keys.activities, &demo_activities(now))?;

    info!("Demo data reset");
    Ok(())
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn demo_posts(now: DateTime<Utc>) -> Vec<Post> {
    vec![
        Post {
            id: "post_001".to_string(),
            author_id: "user_001".to_string(),
            author_name: "Alex Kamau".to_string(),
            author_avatar: "AK".to_string(),
            title: "Funding Milestone Achieved!".to_string(),
            content: "We just closed our seed round of $500K! Building Africa's future one innovation at a time.".to_string(),
            category: "Announcement".to_string(),
            tags: tags(&["Funding", "Startup", "AfricaTech"]),
            role_visible: Some(Role::ALL.to_vec()),
            timestamp: now - Duration::hours(2),
            stats: PostStats {
                views: 245,
                likes: 42,
                comments: 15,
                shares: 8,
                endorsements: 12,
            },
        },
        Post {
            id: "post_002".to_string(),
            author_id: "user_002".to_string(),
            author_name: "Investor Network Africa".to_string(),
            author_avatar: "IN".to_string(),
            title: "Investment Opportunity: Agri-tech in Kenya".to_string(),
            content: "Looking for co-investors for a promising Agri-tech startup in Kenya. Strong team, proven traction.".to_string(),
            category: "Investment".to_string(),
            tags: tags(&["AgriTech", "Kenya", "Investment", "Opportunity"]),
            role_visible: Some(vec![Role::Investor, Role::Mentor]),
            timestamp: now - Duration::hours(5),
            stats: PostStats {
                views: 189,
                likes: 31,
                comments: 9,
                shares: 5,
                endorsements: 8,
            },
        },
        Post {
            id: "post_003".to_string(),
            author_id: "user_003".to_string(),
            author_name: "Sarah Mensah".to_string(),
            author_avatar: "SM".to_string(),
            title: "Mentorship Session Insights".to_string(),
            content: "Just had an amazing mentorship session with a fintech founder. The African startup ecosystem is thriving!".to_string(),
            category: "Experience".to_string(),
            tags: tags(&["Mentorship", "FinTech", "Ecosystem"]),
            role_visible: Some(Role::ALL.to_vec()),
            timestamp: now - Duration::days(1),
            stats: PostStats {
                views: 167,
                likes: 28,
                comments: 7,
                shares: 3,
                endorsements: 6,
            },
        },
    ]
}

pub fn demo_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    let notification = |id: &str, title: &str, message: &str, kind: &str, unread: bool, minutes: i64| {
        Notification {
            id: id.to_string(),
            user_id: DEFAULT_RECIPIENT.to_string(),
            title: title.to_string(),
            message: message.to_string(),
            kind: kind.to_string(),
            icon: notification_icon(kind).to_string(),
            unread,
            timestamp: now - Duration::minutes(minutes),
        }
    };

    vec![
        notification(
            "notif_001",
            "Welcome to Vault Africa!",
            "Your dashboard is now active with role-based features.",
            "welcome",
            false,
            30,
        ),
        notification(
            "notif_002",
            "New Connection Request",
            "Alex Kamau wants to connect with you.",
            "connection",
            true,
            15,
        ),
        notification(
            "notif_003",
            "Mentorship Opportunity",
            "A founder in your sector is looking for mentorship.",
            "mentorship",
            true,
            10,
        ),
    ]
}

pub fn demo_activities(now: DateTime<Utc>) -> Vec<Activity> {
    vec![
        Activity {
            id: "activity_001".to_string(),
            user_id: "user_001".to_string(),
            kind: "post_created".to_string(),
            content: "Created a new post about funding".to_string(),
            timestamp: now - Duration::hours(2),
            role_visible: Some(vec![Role::Founder, Role::Investor]),
        },
        Activity {
            id: "activity_002".to_string(),
            user_id: "user_002".to_string(),
            kind: "investment_made".to_string(),
            content: "Invested $100K in Agri-tech startup".to_string(),
            timestamp: now - Duration::hours(4),
            role_visible: Some(vec![Role::Investor]),
        },
        Activity {
            id: "activity_003".to_string(),
            user_id: "user_003".to_string(),
            kind: "mentorship_completed".to_string(),
            content: "Completed mentorship session with startup founder".to_string(),
            timestamp: now - Duration::days(1),
            role_visible: Some(vec![Role::Mentor, Role::Founder]),
        },
    ]
}
