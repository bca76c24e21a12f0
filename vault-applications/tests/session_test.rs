//! Users, sessions and role switching through the application facade

use vault_applications::{ApplicationError, NewUser, VaultApplication};
use vault_core::{Role, VaultConfig};

fn app() -> VaultApplication {
    VaultApplication::new(VaultConfig::in_memory()).unwrap()
}

#[test]
fn test_create_user_scenario() {
    let app = app();
    let user = app
        .users()
        .create_user(NewUser::new("Amara", "a@x.com", Role::Founder))
        .unwrap();

    assert_eq!(user.vault_score, 10);
    assert_eq!(user.bio, "founder at Vault Africa");
    assert_eq!(
        user.tags,
        vec!["Innovator", "Entrepreneur", "Startup", "African Founder"]
    );

    // the signup award is on record, so recomputing agrees with the default
    assert_eq!(app.content().calculate_vault_score(&user).unwrap(), 10);
}

#[test]
fn test_create_user_idempotent_by_email() {
    let app = app();
    let first = app
        .users()
        .create_user(NewUser::new("Amara", "a@x.com", Role::Founder))
        .unwrap();
    let second = app
        .users()
        .create_user(NewUser::new("Amara", "a@x.com", Role::Founder))
        .unwrap();

    assert_eq!(first.id, second.id);
    // no second signup award either
    assert_eq!(app.content().ledger().history_for(&first.id).len(), 1);
}

#[test]
fn test_second_login_supersedes_first() {
    let app = app();
    app.login("first@x.com", "", Role::Founder).unwrap();
    app.login("second@x.com", "", Role::Investor).unwrap();

    let current = app.current_user().unwrap();
    assert_eq!(current.email, "second@x.com");
    assert_eq!(current.name, "Second");
    assert_eq!(app.session_history().len(), 2);
}

#[test]
fn test_login_signs_up_unknown_email() {
    let app = app();
    assert!(app.users().find_user_by_email("kofi@x.com").is_none());

    let session = app.login("kofi@x.com", "pw", Role::Investor).unwrap();

    let user = app.users().find_user_by_email("kofi@x.com").unwrap();
    assert_eq!(session.user_id, user.id);
    assert_eq!(user.role, Role::Investor);
    assert_eq!(user.vault_score, 0);
}

#[test]
fn test_login_checks_stored_password() {
    let app = app();
    app.signup("Amara", "a@x.com", "secret", Role::Founder)
        .unwrap();
    app.logout().unwrap();

    let err = app.login("a@x.com", "wrong", Role::Founder).unwrap_err();
    assert!(matches!(err, ApplicationError::Authentication { .. }));
    assert!(!app.is_logged_in());

    assert!(app.login("a@x.com", "secret", Role::Founder).is_ok());
}

#[test]
fn test_signup_with_taken_email_checks_stored_password() {
    let app = app();
    app.signup("Amara", "a@x.com", "secret", Role::Founder)
        .unwrap();
    app.logout().unwrap();

    let err = app
        .signup("Mallory", "a@x.com", "guess", Role::Founder)
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Authentication { .. }));
    assert!(!app.is_logged_in());
    assert_eq!(app.users().list_users(None).len(), 1);

    let session = app
        .signup("Amara", "a@x.com", "secret", Role::Founder)
        .unwrap();
    assert_eq!(app.current_user().unwrap().id, session.user_id);
    assert_eq!(app.current_user().unwrap().name, "Amara");
}

#[test]
fn test_logout_keeps_history() {
    let app = app();
    app.login("a@x.com", "", Role::Founder).unwrap();

    assert!(app.logout().unwrap());
    assert!(app.current_session().is_none());
    assert!(app.current_user().is_none());
    assert_eq!(app.session_history().len(), 1);
}

#[test]
fn test_role_switch_is_session_scoped() {
    let app = app();
    app.signup("Amara", "a@x.com", "", Role::Founder).unwrap();

    let session = app.switch_role(Role::Investor).unwrap();
    assert_eq!(session.user_role, Role::Investor);
    assert_eq!(app.view_context().role, Role::Investor);

    // the stored user keeps the role it signed up with
    let user = app.current_user().unwrap();
    assert_eq!(user.role, Role::Founder);

    // and a fresh login starts from it again
    app.logout().unwrap();
    let session = app.login("a@x.com", "", Role::Founder).unwrap();
    assert_eq!(session.user_role, Role::Founder);
}

#[test]
fn test_switch_role_without_session_fails() {
    let app = app();
    let err = app.switch_role(Role::Mentor).unwrap_err();
    assert!(matches!(err, ApplicationError::Session { .. }));
}
