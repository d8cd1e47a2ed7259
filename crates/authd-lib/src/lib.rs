// ============================
// crates/authd-lib/src/lib.rs
// ============================
//! Core credential and session management for `authd`.
//!
//! The [`AuthService`] is the sole entry point; it reads and writes the
//! credential and session stores, delegates hashing and policy checks to
//! the password module, and broadcasts state changes for presentation
//! adapters to consume.

pub mod auth;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthService;
use crate::config::Settings;
use crate::error::AuthError;
use crate::storage::Storage;
use crate::store::{CredentialStore, SessionStore};

/// The assembled core: both stores plus the service wired over them.
///
/// Constructed explicitly from a storage backend and settings rather
/// than through any process-wide singleton, so tests and multiple client
/// contexts can each run their own isolated instance.
pub struct AuthSystem {
    /// The orchestration service; the only component callers talk to
    pub auth: Arc<AuthService>,
    /// Account records
    pub accounts: Arc<CredentialStore>,
    /// Live sessions
    pub sessions: Arc<SessionStore>,
    /// Settings the system was built with
    pub settings: Arc<Settings>,
}

impl AuthSystem {
    /// Load both stores from durable storage and wire up the service
    pub async fn open(storage: Arc<dyn Storage>, settings: Settings) -> Result<Self, AuthError> {
        let accounts = Arc::new(CredentialStore::open(Arc::clone(&storage)).await?);
        let sessions = Arc::new(
            SessionStore::open(
                Arc::clone(&storage),
                Duration::from_secs(settings.session_ttl_secs),
            )
            .await?,
        );
        let auth = Arc::new(AuthService::new(
            Arc::clone(&accounts),
            Arc::clone(&sessions),
            storage,
            settings.password_requirements.clone(),
        ));

        Ok(Self {
            auth,
            accounts,
            sessions,
            settings: Arc::new(settings),
        })
    }
}
