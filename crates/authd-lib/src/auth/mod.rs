// ============================
// crates/authd-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod context;
pub mod password;
pub mod service;
pub mod token;

pub use context::AuthContext;
pub use password::{
    hash_password, hash_password_secure, validate_password_strength, verify_password,
    PasswordRequirements, MIN_PASSWORD_LENGTH,
};
pub use service::{AuthService, AuthStateChanged};
pub use token::generate_secure_token;
