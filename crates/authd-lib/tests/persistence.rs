//! Durability: both stores and the current-token slot survive a restart.
mod common;

use common::{open_system, register_input};
use tempfile::tempdir;

#[tokio::test]
async fn accounts_and_sessions_survive_a_restart() {
    let dir = tempdir().unwrap();

    let session = {
        let system = open_system(dir.path(), 86_400).await;
        system
            .auth
            .register(register_input("tuser", "t@x.com", "Passw0rd"))
            .await
            .unwrap()
    };

    // a fresh system over the same data directory
    let system = open_system(dir.path(), 86_400).await;
    assert!(!system.auth.is_authenticated().await);

    let restored = system
        .auth
        .restore_session(&session.token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(restored.id, session.account.id);
    assert!(system.auth.is_authenticated().await);
}

#[tokio::test]
async fn resume_picks_up_the_persisted_token() {
    let dir = tempdir().unwrap();

    let session = {
        let system = open_system(dir.path(), 86_400).await;
        system
            .auth
            .register(register_input("tuser", "t@x.com", "Passw0rd"))
            .await
            .unwrap()
    };

    let system = open_system(dir.path(), 86_400).await;
    let resumed = system.auth.resume().await.unwrap().unwrap();
    assert_eq!(resumed.id, session.account.id);
}

#[tokio::test]
async fn resume_after_logout_is_anonymous() {
    let dir = tempdir().unwrap();

    {
        let system = open_system(dir.path(), 86_400).await;
        system
            .auth
            .register(register_input("tuser", "t@x.com", "Passw0rd"))
            .await
            .unwrap();
        system.auth.logout().await.unwrap();
    }

    let system = open_system(dir.path(), 86_400).await;
    assert!(system.auth.resume().await.unwrap().is_none());
    assert!(!system.auth.is_authenticated().await);
}

#[tokio::test]
async fn resume_clears_a_dead_persisted_token() {
    let dir = tempdir().unwrap();

    {
        // zero TTL: the persisted session is dead on arrival
        let system = open_system(dir.path(), 0).await;
        system
            .auth
            .register(register_input("tuser", "t@x.com", "Passw0rd"))
            .await
            .unwrap();
    }

    let system = open_system(dir.path(), 0).await;
    assert!(system.auth.resume().await.unwrap().is_none());

    // the stale current-token slot was cleared, so a second resume does
    // not even find a token to check
    assert!(system.auth.resume().await.unwrap().is_none());
}

#[tokio::test]
async fn fresh_data_dir_starts_empty_and_anonymous() {
    let dir = tempdir().unwrap();
    let system = open_system(dir.path(), 86_400).await;

    assert_eq!(system.accounts.count().await, 0);
    assert!(system.sessions.is_empty().await);
    assert!(system.auth.resume().await.unwrap().is_none());
}
