// ============================
// crates/authd-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file implementation.
//!
//! The stores load their state through this trait at startup and flush
//! through it after every mutating call; the files are the sole durable
//! source of truth.
use std::collections::HashMap;
use std::{fs, path::{Path, PathBuf}};
use tokio::fs as tokio_fs;
use async_trait::async_trait;
use authd_common::{Account, Session};
use crate::error::AuthError;

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the full account list; empty if never written
    async fn load_accounts(&self) -> Result<Vec<Account>, AuthError>;

    /// Replace the persisted account list
    async fn save_accounts(&self, accounts: &[Account]) -> Result<(), AuthError>;

    /// Read the token-to-session map; empty if never written
    async fn load_sessions(&self) -> Result<HashMap<String, Session>, AuthError>;

    /// Replace the persisted session map
    async fn save_sessions(&self, sessions: &HashMap<String, Session>) -> Result<(), AuthError>;

    /// Read this client context's active token, if one was persisted
    async fn load_current_token(&self) -> Result<Option<String>, AuthError>;

    /// Persist the active token for this client context
    async fn store_current_token(&self, token: &str) -> Result<(), AuthError>;

    /// Forget the active token; no error if none was stored
    async fn clear_current_token(&self) -> Result<(), AuthError>;
}

const USERS_FILE: &str = "users.json";
const SESSIONS_FILE: &str = "sessions.json";
const CURRENT_TOKEN_FILE: &str = "current_session";

/// Flat-file implementation of the Storage trait
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn load_accounts(&self) -> Result<Vec<Account>, AuthError> {
        let path = self.path(USERS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        let accounts: Vec<Account> = serde_json::from_str(&content)?;
        Ok(accounts)
    }

    async fn save_accounts(&self, accounts: &[Account]) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(accounts)?;
        tokio_fs::write(self.path(USERS_FILE), json).await?;
        Ok(())
    }

    async fn load_sessions(&self) -> Result<HashMap<String, Session>, AuthError> {
        let path = self.path(SESSIONS_FILE);
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        let sessions: HashMap<String, Session> = serde_json::from_str(&content)?;
        Ok(sessions)
    }

    async fn save_sessions(&self, sessions: &HashMap<String, Session>) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(sessions)?;
        tokio_fs::write(self.path(SESSIONS_FILE), json).await?;
        Ok(())
    }

    async fn load_current_token(&self) -> Result<Option<String>, AuthError> {
        let path = self.path(CURRENT_TOKEN_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = tokio_fs::read_to_string(&path).await?;
        let token = content.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    async fn store_current_token(&self, token: &str) -> Result<(), AuthError> {
        tokio_fs::write(self.path(CURRENT_TOKEN_FILE), token).await?;
        Ok(())
    }

    async fn clear_current_token(&self) -> Result<(), AuthError> {
        match tokio_fs::remove_file(self.path(CURRENT_TOKEN_FILE)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
