// crates/authd-lib/src/error.rs

//! Central error type for the credential and session core.
use thiserror::Error;

/// Typed failures returned across the service boundary.
///
/// Every operation reports failure as a value of this type; nothing is
/// thrown past the caller and no variant is fatal to the process.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Duplicate username or email at registration
    #[error("{0} already registered")]
    Conflict(&'static str),

    /// Password and confirmation differ at registration
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password fails the strength policy
    #[error("Password must be at least 8 characters with uppercase, lowercase, and number")]
    WeakPassword,

    /// Unknown email or wrong password. Both causes MUST map to this one
    /// variant so a caller cannot enumerate registered accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Protected operation attempted without a live session
    #[error("User not authenticated")]
    Unauthenticated,

    /// Update referenced a record that does not exist; indicates a caller
    /// bug rather than a normal flow
    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Conflict(_) => "AUTH_001",
            AuthError::PasswordMismatch => "AUTH_002",
            AuthError::WeakPassword => "AUTH_003",
            AuthError::InvalidCredentials => "AUTH_004",
            AuthError::Unauthenticated => "AUTH_005",
            AuthError::NotFound(_) => "NF_001",
            AuthError::InvalidInput(_) => "VAL_001",
            AuthError::Io(_) => "IO_001",
            AuthError::Json(_) => "JSON_001",
            AuthError::Internal(_) => "INT_001",
        }
    }

    /// Get a message safe to show to an end user
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Io(_) | AuthError::Json(_) | AuthError::Internal(_) => {
                "An internal error occurred".to_string()
            },
            other => other.to_string(),
        }
    }
}

impl From<String> for AuthError {
    fn from(msg: String) -> Self {
        AuthError::Internal(msg)
    }
}

impl From<&str> for AuthError {
    fn from(msg: &str) -> Self {
        AuthError::Internal(msg.to_string())
    }
}
