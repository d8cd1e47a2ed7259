// ============================
// crates/authd-lib/src/auth/context.rs
// ============================
//! The caller-visible authentication state for one client context.
//!
//! This is derived state only: it is rebuilt from the session store on
//! startup and after every mutation, and is never itself persisted as a
//! source of truth. Modelling it as a tagged variant rules out the
//! "token present but no account" intermediate states.

/// At most one of these holds for a client context at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    Authenticated { account_id: String, token: String },
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated { .. })
    }

    /// The bound account id, if authenticated
    pub fn account_id(&self) -> Option<&str> {
        match self {
            AuthContext::Authenticated { account_id, .. } => Some(account_id),
            AuthContext::Anonymous => None,
        }
    }

    /// The active session token, if authenticated
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthContext::Authenticated { token, .. } => Some(token),
            AuthContext::Anonymous => None,
        }
    }
}
