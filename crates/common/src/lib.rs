// ================
// crates/common/src/lib.rs
// ================
//! Common types shared between the `authd` core and its callers.
//! Defines the account, profile and session records that the stores
//! persist and the views that cross the service boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered identity with credentials and profile data.
///
/// `username` and `email` are stored lowercased; uniqueness is
/// case-insensitive over both. `password_hash` is a scrypt PHC string and
/// never crosses the service boundary — see [`PublicAccount`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Opaque identifier, generated at creation, never reused
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    /// Immutable creation timestamp
    pub created_at: DateTime<Utc>,
    /// Updated on every successful login
    pub last_login_at: Option<DateTime<Utc>>,
    pub profile: Profile,
}

/// Mutable profile attached to an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub avatar: Option<String>,
    pub bio: String,
    pub skills: Vec<String>,
    pub location: String,
}

impl Profile {
    /// Shallow-merge a patch: fields the patch leaves as `None` are kept.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
    }
}

/// Partial profile update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub location: Option<String>,
}

/// The account view exposed to callers: everything except the credential
/// digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub profile: Profile,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            created_at: account.created_at,
            last_login_at: account.last_login_at,
            profile: account.profile.clone(),
        }
    }
}

/// A time-bounded proof of authentication bound to one account.
///
/// `account_id` is a weak reference: if the account row is gone the
/// session row is dropped, not the other way around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unguessable token, unique among live sessions
    pub token: String,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// A session is live iff the current time is before `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Registration request.
/// # Fields
/// All fields are required and must be non-empty; `password` and
/// `confirm_password` must match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Successful authentication outcome: the account view plus the session
/// token the caller must present on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub account: PublicAccount,
    pub token: String,
}

/// Aggregate figures about the authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStats {
    pub total_accounts: usize,
    pub days_since_registration: i64,
    pub days_since_last_login: Option<i64>,
}
