//! Posts, endorsements, notifications and scores over real storage scopes

use std::sync::Arc;
use vault_applications::demo;
use vault_applications::storage::{FileStore, MemoryStore};
use vault_applications::{
    ApplicationError, NewNotification, NewPost, NewUser, Post, VaultApplication, ViewContext,
};
use vault_core::{KeyValueStore, Role, StorageBackend, VaultConfig};

fn app() -> VaultApplication {
    VaultApplication::new(VaultConfig::in_memory()).unwrap()
}

#[test]
fn test_list_posts_respects_visibility_for_every_role() {
    let app = VaultApplication::with_store(VaultConfig::default(), Arc::new(MemoryStore::new()))
        .unwrap();
    app.content()
        .add_post(NewPost::default().visible_to(vec![Role::Mentor]))
        .unwrap();

    for role in Role::ALL {
        for post in app.content().list_posts(Some(role)) {
            assert!(
                post.role_visible
                    .as_ref()
                    .map_or(true, |roles| roles.contains(&role)),
                "{} saw {}",
                role,
                post.id
            );
        }
    }
}

#[test]
fn test_add_post_visibility_scenario() {
    let app = app();
    let post = app
        .content()
        .add_post(NewPost {
            author_id: Some("u1".to_string()),
            role_visible: Some(vec![Role::Investor]),
            ..NewPost::default()
        })
        .unwrap();

    let ids = |role| -> Vec<String> {
        app.content()
            .list_posts(Some(role))
            .into_iter()
            .map(|p| p.id)
            .collect()
    };
    assert!(!ids(Role::Founder).contains(&post.id));
    assert!(ids(Role::Investor).contains(&post.id));
}

#[test]
fn test_founder_endorsement_rejected_without_changes() {
    let app = app();
    let post = app.content().add_post(NewPost::titled("Pitch", "")).unwrap();
    let notifications_before = app.content().notifications_for(&post.author_id).len();

    let err = app
        .content()
        .endorse_post(&ViewContext::anonymous(Role::Founder), &post.id)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Permission { .. }));
    assert_eq!(app.content().get_post(&post.id).unwrap().stats, post.stats);
    assert_eq!(
        app.content().notifications_for(&post.author_id).len(),
        notifications_before
    );
}

#[test]
fn test_endorsement_notifies_author_as_signed_in_mentor() {
    let app = app();
    let founder = app
        .users()
        .create_user(NewUser::new("Amara Obi", "a@x.com", Role::Founder))
        .unwrap();
    let post = app
        .content()
        .add_post(NewPost::titled("Pitch", "").by_author(&founder.id, &founder.name, &founder.avatar))
        .unwrap();

    app.login("mentor@x.com", "", Role::Mentor).unwrap();
    let endorsement = app.endorse_post(&post.id).unwrap().unwrap();

    assert_eq!(endorsement.post.stats.endorsements, 1);
    assert_eq!(endorsement.notification.user_id, founder.id);
    assert_eq!(endorsement.notification.icon, "fas fa-star");
    assert_eq!(app.users().get_user_by_id(&founder.id).unwrap().vault_score, 15);
}

#[test]
fn test_endorse_missing_post_is_none() {
    let app = app();
    let result = app
        .content()
        .endorse_post(&ViewContext::anonymous(Role::Investor), "post_404")
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_only_founders_publish_through_facade() {
    let app = app();
    app.login("i@x.com", "", Role::Investor).unwrap();

    let err = app.add_post(NewPost::titled("Hi", "")).unwrap_err();
    assert!(matches!(err, ApplicationError::Permission { .. }));

    app.login("f@x.com", "", Role::Founder).unwrap();
    let post = app.add_post(NewPost::titled("Hi", "")).unwrap();
    let founder = app.current_user().unwrap();
    assert_eq!(post.author_id, founder.id);
    assert_eq!(post.author_avatar, founder.avatar);
    assert_eq!(founder.stats.posts, 1);
}

#[test]
fn test_publishing_requires_a_session() {
    let app = app();
    let before = app.content().list_posts(None).len();

    let err = app.add_post(NewPost::titled("Hi", "")).unwrap_err();
    assert!(matches!(err, ApplicationError::Session { .. }));
    assert_eq!(app.content().list_posts(None).len(), before);

    app.login("f@x.com", "", Role::Founder).unwrap();
    app.logout().unwrap();
    assert!(app.add_post(NewPost::titled("Hi", "")).is_err());
    assert_eq!(app.content().list_posts(None).len(), before);
}

#[test]
fn test_mark_notification_read_idempotent() {
    let app = app();
    let notification = app
        .content()
        .add_notification(NewNotification::to_user("u1", "Hi", "There", "welcome"))
        .unwrap();
    assert!(notification.unread);
    assert_eq!(notification.icon, "fas fa-party-horn");

    assert!(app.content().mark_notification_read(&notification.id).unwrap());
    assert!(app.content().mark_notification_read(&notification.id).unwrap());

    let stored = app.content().notifications_for("u1");
    assert!(!stored[0].unread);
    assert_eq!(app.content().count_unread("u1"), 0);
}

#[test]
fn test_score_history_above_100_yields_100() {
    let app = app();
    let founder = app
        .users()
        .create_user(NewUser::new("Amara", "a@x.com", Role::Founder))
        .unwrap();
    for _ in 0..20 {
        app.content().award_points(&founder.id, 10, "milestone").unwrap();
    }

    assert_eq!(app.content().calculate_vault_score(&founder).unwrap(), 100);
    assert_eq!(app.users().get_user_by_id(&founder.id).unwrap().vault_score, 100);
}

#[test]
fn test_corrupt_collection_reads_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set("vault_posts", "[{broken").unwrap();

    let app = VaultApplication::with_store(VaultConfig::in_memory(), store).unwrap();
    assert!(app.content().list_posts(None).is_empty());

    // writing replaces the corrupt value
    app.content().add_post(NewPost::default()).unwrap();
    assert_eq!(app.content().list_posts(None).len(), 1);
}

#[test]
fn test_demo_seed_on_new_scope() {
    let config = VaultConfig {
        storage: vault_core::StorageConfig::memory(),
        ..VaultConfig::default()
    };
    let app = VaultApplication::new(config).unwrap();

    assert_eq!(app.content().list_posts(None).len(), 3);
    assert_eq!(app.content().list_posts(Some(Role::Founder)).len(), 2);
    assert_eq!(app.content().count_unread("current_user"), 2);
    assert_eq!(app.content().list_activities(Some(Role::Investor)).len(), 2);
}

#[test]
fn test_file_store_survives_reopen() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = VaultConfig::in_memory();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = temp_dir.path().to_string_lossy().to_string();

    let post_id = {
        let app = VaultApplication::new(config.clone()).unwrap();
        app.signup("Amara", "a@x.com", "", Role::Founder).unwrap();
        app.add_post(NewPost::titled("Persisted", "")).unwrap().id
    };

    let app = VaultApplication::new(config).unwrap();
    assert_eq!(app.current_user().unwrap().email, "a@x.com");
    assert_eq!(app.content().get_post(&post_id).unwrap().title, "Persisted");

    let reopened = FileStore::new(temp_dir.path()).unwrap();
    assert!(reopened.keys().unwrap().contains(&"vault_posts".to_string()));
}

/// Two applications over one scope each read, modify and write whole
/// collections. Interleaved, the later write drops the earlier change.
#[test]
fn test_concurrent_writers_last_write_wins() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let tab_a = VaultApplication::with_store(VaultConfig::in_memory(), store.clone()).unwrap();
    let tab_b = VaultApplication::with_store(VaultConfig::in_memory(), store).unwrap();

    // B reads, A writes, B writes back its stale read plus its own post
    let mut snapshot_b: Vec<Post> = tab_b.content().list_posts(None);
    tab_a.content().add_post(NewPost::titled("from A", "")).unwrap();

    let mut from_b = demo::demo_posts(chrono::Utc::now()).remove(0);
    from_b.title = "from B".to_string();
    snapshot_b.insert(0, from_b);
    tab_b.content().posts().replace_all(&snapshot_b).unwrap();

    let titles: Vec<String> = tab_a
        .content()
        .list_posts(None)
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["from B"]);
}
