// ============================
// crates/authd-lib/src/auth/service.rs
// ============================
//! The orchestration core: registration, login, logout, session restore,
//! and protected account mutations.
//!
//! This is the only component callers interact with. Each operation is a
//! single deterministic attempt; all validation runs before the first
//! write, so an early failure never leaves a partial mutation behind.
use std::sync::Arc;
use chrono::Utc;
use metrics::counter;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;
use zeroize::Zeroize;

use authd_common::{
    Account, AccountStats, AuthSession, Profile, ProfilePatch, PublicAccount, RegisterInput,
};

use crate::auth::context::AuthContext;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, PasswordRequirements,
};
use crate::error::AuthError;
use crate::storage::Storage;
use crate::store::{CredentialStore, SessionStore};
use crate::validation;

/// Fired after every successful login, logout, and session restore; the
/// presentation adapter renders from this and nothing else.
#[derive(Debug, Clone)]
pub enum AuthStateChanged {
    Anonymous,
    Authenticated(PublicAccount),
}

/// The credential and session core's single entry point.
///
/// State machine per client context:
/// `Anonymous → (login success) → Authenticated → (logout | expiry) → Anonymous`.
pub struct AuthService {
    accounts: Arc<CredentialStore>,
    sessions: Arc<SessionStore>,
    requirements: PasswordRequirements,
    storage: Arc<dyn Storage>,
    context: RwLock<AuthContext>,
    events: broadcast::Sender<AuthStateChanged>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<CredentialStore>,
        sessions: Arc<SessionStore>,
        storage: Arc<dyn Storage>,
        requirements: PasswordRequirements,
    ) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            accounts,
            sessions,
            requirements,
            storage,
            context: RwLock::new(AuthContext::Anonymous),
            events,
        }
    }

    /// Subscribe to auth state changes
    pub fn subscribe(&self) -> broadcast::Receiver<AuthStateChanged> {
        self.events.subscribe()
    }

    /// Register a new account and immediately log it in.
    ///
    /// Check order follows the account form: field presence and email
    /// syntax, then conflicts, then confirmation match, then strength.
    /// Nothing is written until every check has passed.
    pub async fn register(&self, mut input: RegisterInput) -> Result<AuthSession, AuthError> {
        validation::validate_registration(&input)?;

        if self.accounts.find_by_email(&input.email).await.is_some() {
            return Err(AuthError::Conflict("email"));
        }
        if self.accounts.find_by_username(&input.username).await.is_some() {
            return Err(AuthError::Conflict("username"));
        }
        if input.password != input.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if !validate_password_strength(&input.password, &self.requirements) {
            return Err(AuthError::WeakPassword);
        }

        let account = Account {
            id: format!("user_{}", Uuid::new_v4()),
            username: input.username.to_lowercase(),
            email: input.email.to_lowercase(),
            password_hash: hash_password(&input.password)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
            full_name: input.full_name.clone(),
            created_at: Utc::now(),
            last_login_at: None,
            profile: Profile::default(),
        };

        // the store re-checks uniqueness under its write guard, closing the
        // window between the checks above and the insert
        let account = self.accounts.create(account).await?;
        tracing::info!(account_id = %account.id, "account registered");

        let outcome = self.login(&input.email, &input.password).await;
        input.password.zeroize();
        input.confirm_password.zeroize();
        outcome
    }

    /// Authenticate credentials and open a session.
    ///
    /// Unknown email and wrong password both return the identical
    /// `InvalidCredentials` value so callers cannot probe which emails
    /// are registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some(mut account) = self.accounts.find_by_email(email).await else {
            counter!("login.failed", 1);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&account.password_hash, password) {
            counter!("login.failed", 1);
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.sessions.create(account.id.clone()).await?;

        account.last_login_at = Some(Utc::now());
        self.accounts.update(account.clone()).await?;

        self.storage.store_current_token(&session.token).await?;
        *self.context.write().await = AuthContext::Authenticated {
            account_id: account.id.clone(),
            token: session.token.clone(),
        };

        counter!("login.success", 1);
        tracing::info!(account_id = %account.id, "login succeeded");

        let view = PublicAccount::from(&account);
        self.notify(AuthStateChanged::Authenticated(view.clone()));

        Ok(AuthSession {
            account: view,
            token: session.token,
        })
    }

    /// End the current session. Always succeeds, even when already
    /// anonymous or when the session row is already gone.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let mut context = self.context.write().await;

        if let AuthContext::Authenticated { token, .. } = &*context {
            self.sessions.delete(token).await?;
        }
        self.storage.clear_current_token().await?;
        *context = AuthContext::Anonymous;
        drop(context);

        tracing::debug!("logged out");
        self.notify(AuthStateChanged::Anonymous);
        Ok(())
    }

    /// Re-enter an authenticated context from a previously issued token.
    ///
    /// `Ok(None)` is the normal startup outcome when no live session
    /// exists; it is not an error.
    pub async fn restore_session(&self, token: &str) -> Result<Option<PublicAccount>, AuthError> {
        let Some(session) = self.sessions.find_valid(token, &self.accounts).await? else {
            *self.context.write().await = AuthContext::Anonymous;
            return Ok(None);
        };

        // find_valid only returns sessions whose account resolves
        let account = self
            .accounts
            .find_by_id(&session.account_id)
            .await
            .ok_or(AuthError::NotFound("account"))?;

        *self.context.write().await = AuthContext::Authenticated {
            account_id: account.id.clone(),
            token: token.to_string(),
        };

        tracing::info!(account_id = %account.id, "session restored");
        let view = PublicAccount::from(&account);
        self.notify(AuthStateChanged::Authenticated(view.clone()));
        Ok(Some(view))
    }

    /// Restore from the token this client context persisted, if any.
    /// Clears the persisted token when the session turned out dead.
    pub async fn resume(&self) -> Result<Option<PublicAccount>, AuthError> {
        let Some(token) = self.storage.load_current_token().await? else {
            *self.context.write().await = AuthContext::Anonymous;
            return Ok(None);
        };

        let restored = self.restore_session(&token).await?;
        if restored.is_none() {
            self.storage.clear_current_token().await?;
        }
        Ok(restored)
    }

    /// The account view for the current context, if authenticated
    pub async fn current_account(&self) -> Option<PublicAccount> {
        let account_id = self.context.read().await.account_id()?.to_string();
        self.accounts
            .find_by_id(&account_id)
            .await
            .map(|a| PublicAccount::from(&a))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.context.read().await.is_authenticated()
    }

    /// Shallow-merge the patch into the current account's profile.
    /// Fields the patch leaves as `None` are untouched.
    pub async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile, AuthError> {
        let account_id = self.require_authenticated().await?;

        let mut account = self
            .accounts
            .find_by_id(&account_id)
            .await
            .ok_or(AuthError::NotFound("account"))?;
        account.profile.apply(patch);
        let profile = account.profile.clone();

        self.accounts.update(account).await?;
        Ok(profile)
    }

    /// Replace the stored credential after verifying the current one.
    ///
    /// Other live sessions for the account stay valid; only the digest
    /// changes.
    pub async fn change_password(&self, current: &str, next: &str) -> Result<(), AuthError> {
        let account_id = self.require_authenticated().await?;

        let mut account = self
            .accounts
            .find_by_id(&account_id)
            .await
            .ok_or(AuthError::NotFound("account"))?;

        if !verify_password(&account.password_hash, current) {
            return Err(AuthError::InvalidCredentials);
        }
        if !validate_password_strength(next, &self.requirements) {
            return Err(AuthError::WeakPassword);
        }

        account.password_hash =
            hash_password(next).map_err(|e| AuthError::Internal(e.to_string()))?;
        self.accounts.update(account).await?;

        tracing::info!(account_id = %account_id, "password changed");
        Ok(())
    }

    /// Aggregate figures about the authenticated account; `None` when
    /// anonymous
    pub async fn account_stats(&self) -> Option<AccountStats> {
        let account = self.current_account().await?;
        let now = Utc::now();

        Some(AccountStats {
            total_accounts: self.accounts.count().await,
            days_since_registration: (now - account.created_at).num_days(),
            days_since_last_login: account.last_login_at.map(|t| (now - t).num_days()),
        })
    }

    async fn require_authenticated(&self) -> Result<String, AuthError> {
        self.context
            .read()
            .await
            .account_id()
            .map(str::to_string)
            .ok_or(AuthError::Unauthenticated)
    }

    fn notify(&self, event: AuthStateChanged) {
        // nobody listening is fine
        let _ = self.events.send(event);
    }
}
