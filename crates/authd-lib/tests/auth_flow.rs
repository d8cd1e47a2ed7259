//! End-to-end flows through the auth service.
mod common;

use authd_common::ProfilePatch;
use authd_lib::auth::verify_password;
use authd_lib::error::AuthError;
use common::{open_system, register_input};
use tempfile::tempdir;

#[tokio::test]
async fn register_authenticates_and_token_restores_same_account() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    let session = system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();

    assert!(system.auth.is_authenticated().await);
    assert!(session.account.last_login_at.is_some());

    let restored = system.auth.restore_session(&session.token).await.unwrap();
    assert_eq!(restored.unwrap().id, session.account.id);
}

#[tokio::test]
async fn duplicate_email_conflicts_regardless_of_case() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    system
        .auth
        .register(register_input("first", "A@x.com", "Passw0rd"))
        .await
        .unwrap();

    let err = system
        .auth
        .register(register_input("second", "a@x.com", "Passw0rd"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict("email")));

    // same for usernames
    let err = system
        .auth
        .register(register_input("FIRST", "other@x.com", "Passw0rd"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict("username")));
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();
    system.auth.logout().await.unwrap();

    let unknown = system
        .auth
        .login("unknown@x.com", "anything")
        .await
        .unwrap_err();
    let wrong = system.auth.login("t@x.com", "WrongPassw0rd").await.unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert_eq!(unknown.error_code(), wrong.error_code());
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[tokio::test]
async fn failed_registration_writes_nothing() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    let mut mismatched = register_input("tuser", "t@x.com", "Passw0rd");
    mismatched.confirm_password = "Different1".to_string();
    let err = system.auth.register(mismatched).await.unwrap_err();
    assert!(matches!(err, AuthError::PasswordMismatch));

    let err = system
        .auth
        .register(register_input("tuser", "t@x.com", "weakpass"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword));

    assert!(system.accounts.find_by_email("t@x.com").await.is_none());
    assert!(!system.auth.is_authenticated().await);
    assert!(system.sessions.is_empty().await);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();

    system.auth.logout().await.unwrap();
    assert!(!system.auth.is_authenticated().await);

    // a second logout from an anonymous context still reports success
    system.auth.logout().await.unwrap();
    assert!(!system.auth.is_authenticated().await);
}

#[tokio::test]
async fn protected_operations_require_a_session() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    let err = system
        .auth
        .update_profile(ProfilePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated));

    let err = system
        .auth
        .change_password("Passw0rd", "NewPassw0rd1")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Unauthenticated));

    assert!(system.auth.account_stats().await.is_none());
    assert!(system.auth.current_account().await.is_none());
}

#[tokio::test]
async fn profile_update_merges_shallowly() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();

    system
        .auth
        .update_profile(ProfilePatch {
            bio: Some("systems person".to_string()),
            skills: Some(vec!["Rust".to_string()]),
            ..Default::default()
        })
        .await
        .unwrap();

    // a later patch touching one field leaves the others alone
    let profile = system
        .auth
        .update_profile(ProfilePatch {
            location: Some("Oslo".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(profile.bio, "systems person");
    assert_eq!(profile.skills, vec!["Rust".to_string()]);
    assert_eq!(profile.location, "Oslo");
}

#[tokio::test]
async fn rejected_password_change_leaves_the_stored_hash_alone() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();

    // correct current password, weak replacement
    let err = system
        .auth
        .change_password("Passw0rd", "weak")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword));

    // wrong current password
    let err = system
        .auth
        .change_password("NotPassw0rd", "StillGood1")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let account = system.accounts.find_by_email("t@x.com").await.unwrap();
    assert!(verify_password(&account.password_hash, "Passw0rd"));
}

#[tokio::test]
async fn successful_password_change_swaps_the_credential() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();

    system
        .auth
        .change_password("Passw0rd", "NewPassw0rd1")
        .await
        .unwrap();
    system.auth.logout().await.unwrap();

    let err = system.auth.login("t@x.com", "Passw0rd").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let session = system.auth.login("t@x.com", "NewPassw0rd1").await.unwrap();
    assert_eq!(session.account.email, "t@x.com");
}

#[tokio::test]
async fn register_logout_login_round_trip() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    let registered = system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();
    assert!(system.auth.is_authenticated().await);
    assert_eq!(registered.account.email, "t@x.com");
    assert!(registered.account.last_login_at.is_some());

    system.auth.logout().await.unwrap();
    assert!(!system.auth.is_authenticated().await);

    let logged_in = system.auth.login("t@x.com", "Passw0rd").await.unwrap();
    assert!(system.auth.is_authenticated().await);
    assert_eq!(logged_in.account.id, registered.account.id);
}

#[tokio::test]
async fn stats_reflect_the_authenticated_account() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    system
        .auth
        .register(register_input("tuser", "t@x.com", "Passw0rd"))
        .await
        .unwrap();

    let stats = system.auth.account_stats().await.unwrap();
    assert_eq!(stats.total_accounts, 1);
    assert_eq!(stats.days_since_registration, 0);
    assert_eq!(stats.days_since_last_login, Some(0));
}
