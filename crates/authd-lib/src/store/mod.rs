// ============================
// crates/authd-lib/src/store/mod.rs
// ============================
//! Durable stores: accounts and sessions.

pub mod credential;
pub mod session;

pub use credential::CredentialStore;
pub use session::{SessionEvent, SessionStore, DEFAULT_SESSION_TTL};
