//! View Composer
//!
//! A pure function of (context, section, data). It reads no storage and
//! keeps no state; switching role is just composing again with a different
//! context.

use super::types::*;
use crate::auth::{Action, ViewContext};
use crate::content::{score_category, unread_badge};
use chrono::{DateTime, Utc};
use vault_core::Role;

/// Vault score shown on the founder overview when nobody is signed in
const PLACEHOLDER_FOUNDER_SCORE: &str = "72";

pub fn compose(ctx: &ViewContext, section: Section, data: &ViewData) -> ViewFragment {
    match section {
        Section::Overview => ViewFragment::Overview(overview(ctx, data)),
        Section::Feed => ViewFragment::Feed(feed(ctx, data)),
        Section::Discover => ViewFragment::Discover(discover(ctx, data)),
        Section::Profile => ViewFragment::Profile(profile(ctx)),
    }
}

/// Coarse age of `timestamp` as seen at `now`: minutes, hours, then days
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - timestamp).max(chrono::Duration::zero());
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();

    if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

fn s(value: &str) -> String {
    value.to_string()
}

fn stat(icon: &str, value: impl Into<String>, label: &str) -> StatCard {
    StatCard {
        icon: s(icon),
        value: value.into(),
        label: s(label),
    }
}

fn stage(label: &str, count: u32) -> Stage {
    Stage {
        label: s(label),
        count,
    }
}

fn quick(id: &str, label: &str, icon: &str) -> QuickAction {
    QuickAction {
        id: s(id),
        label: s(label),
        icon: s(icon),
    }
}

fn overview(ctx: &ViewContext, data: &ViewData) -> OverviewView {
    let (banner, stats, panel, quick_actions) = match ctx.role {
        Role::Founder => {
            let score = ctx
                .user
                .as_ref()
                .map_or_else(|| s(PLACEHOLDER_FOUNDER_SCORE), |u| u.vault_score.to_string());
            (
                ("Welcome back, Founder!", "Track your innovation journey and connect with investors"),
                vec![
                    stat("fas fa-lightbulb", "5", "Active Projects"),
                    stat("fas fa-chart-line", score, "Vault Score"),
                    stat("fas fa-handshake", "12", "Investor Connections"),
                    stat("fas fa-graduation-cap", "3/5", "Courses Completed"),
                ],
                OverviewPanel::Pipeline {
                    title: s("Project Pipeline"),
                    stages: vec![
                        stage("Draft", 2),
                        stage("Submitted", 1),
                        stage("Funded", 1),
                        stage("In Progress", 1),
                    ],
                },
                vec![
                    quick("create_post", "Post Update", "fas fa-plus-circle"),
                    quick("find_investors", "Find Investors", "fas fa-search-dollar"),
                    quick("browse_courses", "Take Course", "fas fa-graduation-cap"),
                    quick("request_mentorship", "Get Mentorship", "fas fa-hands-helping"),
                ],
            )
        }
        Role::Investor => (
            ("Welcome back, Investor!", "Discover Africa's most promising innovations"),
            vec![
                stat("fas fa-chart-pie", "8", "Portfolio Companies"),
                stat("fas fa-hand-holding-usd", "$2.4M", "Total Invested"),
                stat("fas fa-filter", "24", "Deals in Pipeline"),
                stat("fas fa-percentage", "18.5%", "Avg. ROI"),
            ],
            OverviewPanel::DealFlow {
                title: s("Deal Flow"),
                stages: vec![
                    stage("New", 12),
                    stage("Reviewed", 8),
                    stage("Due Diligence", 3),
                    stage("Invested", 1),
                ],
            },
            vec![
                quick("discover_startups", "Discover Startups", "fas fa-binoculars"),
                quick("portfolio_analytics", "Portfolio Analytics", "fas fa-chart-bar"),
                quick("market_reports", "Market Reports", "fas fa-file-alt"),
                quick("coinvest", "Find Co-investors", "fas fa-users"),
            ],
        ),
        Role::Mentor => (
            ("Welcome back, Mentor!", "Guide Africa's next generation of innovators"),
            vec![
                stat("fas fa-users", "6", "Active Mentees"),
                stat("fas fa-calendar-check", "15", "Sessions This Month"),
                stat("fas fa-star", "4.8", "Average Rating"),
                stat("fas fa-graduation-cap", "3", "Workshops Hosted"),
            ],
            OverviewPanel::MentorshipQueue {
                title: s("Mentorship Queue"),
                items: vec![
                    QueueItem {
                        title: s("Review pitch deck"),
                        detail: s("From: Tech startup in Lagos"),
                        action: s("Review"),
                    },
                    QueueItem {
                        title: s("Business strategy session"),
                        detail: s("Scheduled: Tomorrow 2 PM"),
                        action: s("Join"),
                    },
                    QueueItem {
                        title: s("New mentorship request"),
                        detail: s("From: Founder in Nairobi"),
                        action: s("View"),
                    },
                ],
            },
            vec![
                quick("view_mentees", "View Mentees", "fas fa-user-friends"),
                quick("schedule_session", "Schedule Session", "fas fa-calendar-plus"),
                quick("create_content", "Create Content", "fas fa-edit"),
                quick("community_forum", "Community Forum", "fas fa-comments"),
            ],
        ),
    };

    OverviewView {
        role: ctx.role,
        banner: Banner {
            title: s(banner.0),
            subtitle: s(banner.1),
        },
        stats,
        panel,
        quick_actions,
        unread_badge: unread_badge(data.unread_count),
    }
}

fn feed(ctx: &ViewContext, data: &ViewData) -> FeedView {
    let can_endorse = ctx.can(Action::EndorsePost);
    let items = data
        .posts
        .iter()
        .filter(|post| post.is_visible_to(ctx.role))
        .map(|post| FeedItem {
            liked: data.liked_posts.iter().any(|id| *id == post.id),
            time_ago: format_time_ago(post.timestamp, data.now),
            can_endorse: can_endorse && ctx.user_id() != Some(post.author_id.as_str()),
            post: post.clone(),
        })
        .collect();

    FeedView {
        role: ctx.role,
        can_post: ctx.can(Action::CreatePost),
        items,
    }
}

fn connect(icon: &str, title: &str, description: &str, action: &str) -> ConnectCard {
    ConnectCard {
        icon: s(icon),
        title: s(title),
        description: s(description),
        action: s(action),
    }
}

fn demo_candidate(id: &str, name: &str, headline: &str, score: u8, tags: &[&str], saved: &[String]) -> CandidateCard {
    CandidateCard {
        id: s(id),
        avatar: crate::auth::identity::generate_avatar(name),
        name: s(name),
        headline: s(headline),
        vault_score: score,
        tags: tags.iter().map(|t| s(t)).collect(),
        saved: saved.iter().any(|f| f == id),
        demo: true,
    }
}

fn discover(ctx: &ViewContext, data: &ViewData) -> DiscoverView {
    match ctx.role {
        Role::Founder => DiscoverView {
            role: ctx.role,
            title: s("Discover Investors & Mentors"),
            content: DiscoverContent::Connect {
                cards: vec![
                    connect("fas fa-user-tie", "Investor Match", "Find investors interested in your sector", "Find Investors"),
                    connect("fas fa-hands-helping", "Mentor Connect", "Connect with industry experts", "Find Mentors"),
                    connect("fas fa-users", "Founder Network", "Connect with other African founders", "Join Network"),
                ],
            },
        },
        role => {
            let mut cards: Vec<CandidateCard> = data
                .founders
                .iter()
                .filter(|founder| ctx.user_id() != Some(founder.id.as_str()))
                .map(|founder| CandidateCard {
                    id: founder.id.clone(),
                    name: founder.name.clone(),
                    avatar: founder.avatar.clone(),
                    headline: format!("{} · {}", founder.bio, founder.location),
                    vault_score: founder.vault_score,
                    tags: founder.tags.clone(),
                    saved: data.saved_founders.iter().any(|id| *id == founder.id),
                    demo: false,
                })
                .collect();

            if cards.is_empty() {
                cards = match role {
                    Role::Investor => vec![
                        demo_candidate("demo_farmconnect", "FarmConnect", "Kenya · AgriTech · Seed Stage · Team of 5", 85, &["AgriTech", "Kenya"], &data.saved_founders),
                        demo_candidate("demo_medipay", "MediPay", "Nigeria · HealthTech · Series A · Team of 12", 92, &["HealthTech", "Nigeria"], &data.saved_founders),
                    ],
                    _ => vec![
                        demo_candidate("demo_sarah_chukwu", "Sarah Chukwu", "FinTech Founder · Lagos", 78, &["FinTech"], &data.saved_founders),
                        demo_candidate("demo_david_omondi", "David Omondi", "EdTech Founder · Nairobi", 65, &["EdTech"], &data.saved_founders),
                    ],
                };
            }

            let (title, action) = if role == Role::Investor {
                ("Discover Startups", "View Details")
            } else {
                ("Discover Founders", "Offer Mentorship")
            };

            DiscoverView {
                role,
                title: s(title),
                content: DiscoverContent::Candidates {
                    cards,
                    action: s(action),
                },
            }
        }
    }
}

fn profile(ctx: &ViewContext) -> ProfileView {
    let role = ctx.role;
    let user = ctx.user.as_ref();
    let stats = user.map(|u| u.stats.clone()).unwrap_or_default();

    let (primary_label, primary_value) = match role {
        Role::Founder => ("Projects", stats.posts),
        Role::Investor => ("Investments", stats.investments),
        Role::Mentor => ("Mentees", stats.mentorship_sessions),
    };
    let about = match role {
        Role::Founder => "Innovator building Africa's future",
        Role::Investor => "Investor in African innovation",
        Role::Mentor => "Mentor guiding African founders",
    };

    let mut profile_stats = vec![
        ProfileStat {
            label: s(primary_label),
            value: primary_value.to_string(),
        },
        ProfileStat {
            label: s("Connections"),
            value: stats.connections.to_string(),
        },
    ];

    let vault_score = user.map_or(0, |u| u.vault_score);
    let score_label = if role == Role::Founder {
        profile_stats.push(ProfileStat {
            label: s("Vault Score"),
            value: vault_score.to_string(),
        });
        Some(s(score_category(vault_score)))
    } else {
        profile_stats.push(ProfileStat {
            label: s("Posts"),
            value: stats.posts.to_string(),
        });
        None
    };

    ProfileView {
        name: s(ctx.display_name()),
        avatar: user.map_or_else(|| s("UN"), |u| u.avatar.clone()),
        role,
        role_label: s(role.label()),
        location: user.map_or_else(|| s("Africa"), |u| u.location.clone()),
        about: user.map_or_else(|| s(about), |u| u.bio.clone()),
        tags: user.map(|u| u.tags.clone()).unwrap_or_default(),
        stats: profile_stats,
        score_category: score_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{NewUser, User};
    use crate::content::{Post, PostStats};
    use chrono::Duration;

    fn post(id: &str, visible: Option<Vec<Role>>, age: Duration, now: DateTime<Utc>) -> Post {
        Post {
            id: s(id),
            author_id: s("a1"),
            author_name: s("Author"),
            author_avatar: s("AU"),
            title: s(id),
            content: String::new(),
            category: s("General"),
            tags: vec![],
            role_visible: visible,
            timestamp: now - age,
            stats: PostStats::default(),
        }
    }

    #[test]
    fn test_time_ago_boundaries() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_time_ago(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(format_time_ago(now - Duration::minutes(60), now), "1h ago");
        assert_eq!(format_time_ago(now - Duration::hours(23), now), "23h ago");
        assert_eq!(format_time_ago(now - Duration::hours(24), now), "1d ago");
        assert_eq!(format_time_ago(now + Duration::minutes(3), now), "0m ago");
    }

    #[test]
    fn test_feed_filters_by_role() {
        let now = Utc::now();
        let data = ViewData {
            posts: vec![
                post("public", None, Duration::hours(1), now),
                post("investors", Some(vec![Role::Investor]), Duration::hours(2), now),
            ],
            liked_posts: vec![s("public")],
            now,
            ..ViewData::default()
        };

        let ViewFragment::Feed(view) = compose(&ViewContext::anonymous(Role::Founder), Section::Feed, &data) else {
            panic!("expected feed");
        };
        assert_eq!(view.items.len(), 1);
        assert!(view.items[0].liked);
        assert_eq!(view.items[0].time_ago, "1h ago");
        assert!(view.can_post);
        assert!(!view.items[0].can_endorse);

        let ViewFragment::Feed(view) = compose(&ViewContext::anonymous(Role::Investor), Section::Feed, &data) else {
            panic!("expected feed");
        };
        assert_eq!(view.items.len(), 2);
        assert!(!view.can_post);
        assert!(view.items[1].can_endorse);
    }

    #[test]
    fn test_overview_uses_real_founder_score() {
        let mut user = User::from_new(s("u1"), NewUser::new("Amara", "a@x.com", Role::Founder));
        user.vault_score = 37;
        let data = ViewData {
            unread_count: 150,
            ..ViewData::default()
        };

        let ViewFragment::Overview(view) = compose(&ViewContext::for_user(user), Section::Overview, &data) else {
            panic!("expected overview");
        };
        assert_eq!(view.stats[1].value, "37");
        assert_eq!(view.unread_badge, "99+");
        assert!(matches!(view.panel, OverviewPanel::Pipeline { .. }));
    }

    #[test]
    fn test_role_switch_changes_overview() {
        let data = ViewData::default();
        let ctx = ViewContext::anonymous(Role::Founder);

        let founder = compose(&ctx, Section::Overview, &data);
        let mentor = compose(&ctx.clone().with_role(Role::Mentor), Section::Overview, &data);

        let ViewFragment::Overview(mentor) = mentor else {
            panic!("expected overview");
        };
        assert_eq!(mentor.banner.title, "Welcome back, Mentor!");
        assert_ne!(founder, ViewFragment::Overview(mentor));
    }

    #[test]
    fn test_discover_falls_back_to_demo_candidates() {
        let data = ViewData {
            saved_founders: vec![s("demo_medipay")],
            ..ViewData::default()
        };
        let ViewFragment::Discover(view) = compose(&ViewContext::anonymous(Role::Investor), Section::Discover, &data) else {
            panic!("expected discover");
        };
        let DiscoverContent::Candidates { cards, .. } = view.content else {
            panic!("expected candidates");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].name, "FarmConnect");
        assert_eq!(cards[0].vault_score, 85);
        assert!(cards[1].saved);
        assert!(cards.iter().all(|c| c.demo));
    }

    #[test]
    fn test_discover_lists_stored_founders() {
        let founder = User::from_new(s("f1"), NewUser::new("Zara Ali", "z@x.com", Role::Founder));
        let data = ViewData {
            founders: vec![founder],
            ..ViewData::default()
        };
        let ViewFragment::Discover(view) = compose(&ViewContext::anonymous(Role::Mentor), Section::Discover, &data) else {
            panic!("expected discover");
        };
        let DiscoverContent::Candidates { cards, action } = view.content else {
            panic!("expected candidates");
        };
        assert_eq!(action, "Offer Mentorship");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].avatar, "ZA");
        assert_eq!(cards[0].vault_score, 10);
        assert!(!cards[0].demo);
    }

    #[test]
    fn test_profile_counters_from_stats() {
        let mut user = User::from_new(s("i1"), NewUser::new("Kofi", "k@x.com", Role::Investor));
        user.stats.investments = 4;
        user.stats.connections = 9;

        let view = profile(&ViewContext::for_user(user));
        assert_eq!(view.stats[0].label, "Investments");
        assert_eq!(view.stats[0].value, "4");
        assert_eq!(view.stats[1].value, "9");
        assert!(view.score_category.is_none());

        let anonymous = profile(&ViewContext::anonymous(Role::Founder));
        assert_eq!(anonymous.name, "User Name");
        assert_eq!(anonymous.score_category.as_deref(), Some("Beginner"));
    }
}
