//! Change events and the page action surface

use tokio::sync::broadcast::{self, error::TryRecvError, Receiver};
use vault_applications::events::EVENT_BUFFER;
use vault_applications::{DataEvent, NewPost, NoticeLevel, PageActions, VaultApplication};
use vault_core::{Role, Theme, VaultConfig};

fn drain(rx: &mut Receiver<DataEvent>) -> Vec<DataEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
    events
}

fn notices(events: &[DataEvent], wanted: NoticeLevel) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            DataEvent::Notice { level, message } if *level == wanted => Some(message.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_ready_reaches_early_subscribers() {
    let (tx, mut rx) = broadcast::channel(EVENT_BUFFER);
    let _app = VaultApplication::builder(VaultConfig::in_memory())
        .with_events(tx)
        .build()
        .unwrap();

    assert_eq!(drain(&mut rx), vec![DataEvent::Ready]);
}

#[test]
fn test_mutations_emit_after_completion() {
    let app = VaultApplication::new(VaultConfig::in_memory()).unwrap();
    let mut rx = app.subscribe();

    let session = app.signup("Amara", "a@x.com", "", Role::Founder).unwrap();
    let post = app.add_post(NewPost::titled("Launch", "We shipped")).unwrap();
    app.switch_role(Role::Mentor).unwrap();
    app.toggle_theme().unwrap();

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            DataEvent::SessionStarted {
                user_id: session.user_id,
                role: Role::Founder,
            },
            DataEvent::PostAdded { post_id: post.id },
            DataEvent::RoleSwitched {
                from: Role::Founder,
                to: Role::Mentor,
            },
            DataEvent::ThemeChanged { theme: Theme::Dark },
        ]
    );
}

#[test]
fn test_switch_to_same_role_is_silent() {
    let app = VaultApplication::new(VaultConfig::in_memory()).unwrap();
    app.login("k@x.com", "", Role::Investor).unwrap();
    let mut rx = app.subscribe();

    app.switch_role(Role::Investor).unwrap();
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_founder_endorse_action_reports_error_notice() {
    let app = VaultApplication::new(VaultConfig::in_memory()).unwrap();
    let actions = PageActions::new(&app);
    assert!(actions.signup("Amara", "a@x.com", "", "founder"));
    let post = app.add_post(NewPost::titled("Pitch", "")).unwrap();
    let mut rx = app.subscribe();

    assert!(!actions.endorse_post(&post.id));

    let events = drain(&mut rx);
    assert_eq!(notices(&events, NoticeLevel::Error).len(), 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, DataEvent::PostUpdated { .. })));
    assert_eq!(app.content().get_post(&post.id).unwrap().stats.endorsements, 0);
}

#[test]
fn test_like_action_reports_success() {
    let app = VaultApplication::new(VaultConfig::in_memory()).unwrap();
    let post = app.content().add_post(NewPost::default()).unwrap();
    let actions = PageActions::new(&app);
    let mut rx = app.subscribe();

    assert!(actions.like_post(&post.id));
    assert!(actions.like_post(&post.id));

    let events = drain(&mut rx);
    assert_eq!(
        notices(&events, NoticeLevel::Success),
        vec!["Post liked!", "Post unliked"]
    );
}

#[test]
fn test_unknown_role_string_is_refused() {
    let app = VaultApplication::new(VaultConfig::in_memory()).unwrap();
    let actions = PageActions::new(&app);
    let mut rx = app.subscribe();

    assert!(!actions.login("a@x.com", "", "admin"));
    assert!(!app.is_logged_in());
    assert_eq!(notices(&drain(&mut rx), NoticeLevel::Error).len(), 1);
}

#[test]
fn test_missing_targets_return_false_quietly() {
    let app = VaultApplication::new(VaultConfig::in_memory()).unwrap();
    let actions = PageActions::new(&app);
    assert!(actions.login("k@x.com", "", "investor"));
    let mut rx = app.subscribe();

    assert!(!actions.like_post("post_missing"));
    assert!(app.content().liked_posts().is_empty());
    assert!(!actions.endorse_post("post_missing"));
    assert!(!actions.share_post("post_missing"));
    assert!(!actions.mark_notification_read("notif_missing"));
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_reset_demo_data_action() {
    let config = VaultConfig {
        storage: vault_core::StorageConfig::memory(),
        ..VaultConfig::default()
    };
    let app = VaultApplication::new(config).unwrap();
    app.content().add_post(NewPost::titled("Extra", "")).unwrap();
    assert_eq!(app.content().list_posts(None).len(), 4);

    let mut rx = app.subscribe();
    assert!(PageActions::new(&app).reset_demo_data());

    assert_eq!(app.content().list_posts(None).len(), 3);
    assert!(drain(&mut rx).contains(&DataEvent::DemoDataReset));
}
