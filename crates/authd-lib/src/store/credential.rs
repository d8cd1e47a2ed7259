// ============================
// crates/authd-lib/src/store/credential.rs
// ============================
//! Durable account records keyed by identity.
//!
//! Owns the uniqueness invariant: no two accounts share a normalized
//! username or email. The in-memory list is loaded from storage once at
//! construction and flushed back after every mutation.
use std::sync::Arc;
use tokio::sync::RwLock;
use authd_common::Account;
use crate::error::AuthError;
use crate::storage::Storage;

pub struct CredentialStore {
    accounts: RwLock<Vec<Account>>,
    storage: Arc<dyn Storage>,
}

impl CredentialStore {
    /// Load the account list from durable storage
    pub async fn open(storage: Arc<dyn Storage>) -> Result<Self, AuthError> {
        let accounts = storage.load_accounts().await?;
        Ok(Self {
            accounts: RwLock::new(accounts),
            storage,
        })
    }

    /// Insert a new account.
    ///
    /// The uniqueness check and the insert run under a single write guard,
    /// so two concurrent registrations cannot both pass the check.
    pub async fn create(&self, account: Account) -> Result<Account, AuthError> {
        let mut accounts = self.accounts.write().await;

        if accounts
            .iter()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(AuthError::Conflict("email"));
        }

        if accounts
            .iter()
            .any(|a| a.username.eq_ignore_ascii_case(&account.username))
        {
            return Err(AuthError::Conflict("username"));
        }

        accounts.push(account.clone());
        self.storage.save_accounts(&accounts).await?;

        metrics::counter!("account.created", 1);
        metrics::gauge!("account.total", accounts.len() as f64);

        Ok(account)
    }

    /// Case-insensitive exact match on email
    pub async fn find_by_email(&self, email: &str) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Case-insensitive exact match on username
    pub async fn find_by_username(&self, username: &str) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|a| a.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Account> {
        let accounts = self.accounts.read().await;
        accounts.iter().find(|a| a.id == id).cloned()
    }

    /// Full replace of a previously created record.
    ///
    /// There is no partial update; callers read, mutate a copy, and call
    /// this. No deletion is exposed at all.
    pub async fn update(&self, account: Account) -> Result<(), AuthError> {
        let mut accounts = self.accounts.write().await;

        let Some(slot) = accounts.iter_mut().find(|a| a.id == account.id) else {
            return Err(AuthError::NotFound("account"));
        };
        *slot = account;

        self.storage.save_accounts(&accounts).await?;
        Ok(())
    }

    /// Number of registered accounts
    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}
