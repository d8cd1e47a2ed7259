// ============================
// crates/authd-lib/src/store/session.rs
// ============================
//! Session token handling and lifecycle.
//!
//! Expiry is enforced lazily at read time: an expired row is deleted the
//! first time it is looked up, so no background sweep task is needed.
//! Every mutation is broadcast as a [`SessionEvent`], which lets any
//! number of contexts (other tabs, a presentation adapter, tests) react
//! to session changes without watching the storage layer directly.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use metrics::{counter, gauge};
use authd_common::Session;
use crate::auth::token::generate_secure_token;
use crate::error::AuthError;
use crate::storage::Storage;
use crate::store::CredentialStore;

/// Default session TTL (time to live)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24); // 24 hours

/// Emitted on every session mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Created { token: String },
    Deleted { token: String },
    /// Dropped lazily after its TTL elapsed
    Expired { token: String },
}

/// Store of live sessions for all authenticated contexts
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: chrono::Duration,
    storage: Arc<dyn Storage>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    /// Load persisted sessions and fix the TTL for newly created ones
    pub async fn open(storage: Arc<dyn Storage>, ttl: Duration) -> Result<Self, AuthError> {
        let sessions = storage.load_sessions().await?;
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let (events, _) = broadcast::channel(32);

        Ok(Self {
            sessions: RwLock::new(sessions),
            ttl,
            storage,
            events,
        })
    }

    /// Create a session bound to `account_id`.
    ///
    /// The token is regenerated until it is unique among live tokens;
    /// with 256 bits of entropy a retry is astronomically unlikely, the
    /// loop just makes the uniqueness invariant unconditional.
    pub async fn create(&self, account_id: String) -> Result<Session, AuthError> {
        let mut sessions = self.sessions.write().await;

        let mut token = generate_secure_token();
        while sessions.contains_key(&token) {
            token = generate_secure_token();
        }

        let now = Utc::now();
        let session = Session {
            token: token.clone(),
            account_id,
            created_at: now,
            expires_at: now + self.ttl,
        };
        sessions.insert(token.clone(), session.clone());
        self.storage.save_sessions(&sessions).await?;

        counter!("session.created", 1);
        gauge!("session.active", sessions.len() as f64);

        let _ = self.events.send(SessionEvent::Created { token });
        Ok(session)
    }

    /// Look up a live session.
    ///
    /// Returns the session only if the token is present, unexpired, and
    /// its account still resolves. A present-but-expired row is deleted
    /// before reporting absent, and so is a row whose account is gone
    /// (the session holds a weak reference to the account, never the
    /// reverse).
    pub async fn find_valid(
        &self,
        token: &str,
        accounts: &CredentialStore,
    ) -> Result<Option<Session>, AuthError> {
        let mut sessions = self.sessions.write().await;

        let Some(session) = sessions.get(token).cloned() else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            sessions.remove(token);
            self.storage.save_sessions(&sessions).await?;

            counter!("session.expired", 1);
            gauge!("session.active", sessions.len() as f64);

            let _ = self.events.send(SessionEvent::Expired {
                token: token.to_string(),
            });
            return Ok(None);
        }

        if accounts.find_by_id(&session.account_id).await.is_none() {
            tracing::warn!(token_prefix = &token[..8.min(token.len())], "dropping session bound to missing account");
            sessions.remove(token);
            self.storage.save_sessions(&sessions).await?;

            let _ = self.events.send(SessionEvent::Deleted {
                token: token.to_string(),
            });
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Delete a session; idempotent, absent tokens are not an error
    pub async fn delete(&self, token: &str) -> Result<(), AuthError> {
        let mut sessions = self.sessions.write().await;

        if sessions.remove(token).is_some() {
            self.storage.save_sessions(&sessions).await?;

            counter!("session.deleted", 1);
            gauge!("session.active", sessions.len() as f64);

            let _ = self.events.send(SessionEvent::Deleted {
                token: token.to_string(),
            });
        }

        Ok(())
    }

    /// Subscribe to session mutations
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Number of sessions currently held, expired rows included until
    /// their first read
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
