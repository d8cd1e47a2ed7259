#![allow(dead_code)]
use std::path::Path;
use std::sync::Arc;

use authd_common::RegisterInput;
use authd_lib::config::Settings;
use authd_lib::storage::FlatFileStorage;
use authd_lib::AuthSystem;

/// Open an isolated system over `dir` with the given session TTL
pub async fn open_system(dir: &Path, session_ttl_secs: u64) -> AuthSystem {
    let settings = Settings {
        data_dir: dir.to_path_buf(),
        session_ttl_secs,
        ..Default::default()
    };
    let storage = Arc::new(FlatFileStorage::new(dir).unwrap());
    AuthSystem::open(storage, settings).await.unwrap()
}

/// A valid registration request for the given identity
pub fn register_input(username: &str, email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        full_name: "Test User".to_string(),
        email: email.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    }
}
