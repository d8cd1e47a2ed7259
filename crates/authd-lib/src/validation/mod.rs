// ============================
// crates/authd-lib/src/validation/mod.rs
// ============================
//! Registration input validation.

use authd_common::RegisterInput;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::AuthError;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_USERNAME_LENGTH: usize = 50;
const MAX_FULL_NAME_LENGTH: usize = 100;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Validate email syntax
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "Email cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(AuthError::InvalidInput(
            "Please enter a valid email address".to_string(),
        ));
    }

    Ok(())
}

/// Validate a registration request's field presence and shapes.
///
/// Uniqueness, password confirmation and strength are checked by the
/// service after this passes; this stage never touches the stores.
pub fn validate_registration(input: &RegisterInput) -> Result<(), AuthError> {
    if input.full_name.trim().is_empty()
        || input.email.trim().is_empty()
        || input.username.trim().is_empty()
        || input.password.is_empty()
        || input.confirm_password.is_empty()
    {
        return Err(AuthError::InvalidInput(
            "All fields are required".to_string(),
        ));
    }

    if input.username.len() > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "Username cannot exceed {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if input.full_name.len() > MAX_FULL_NAME_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "Name cannot exceed {MAX_FULL_NAME_LENGTH} characters"
        )));
    }

    validate_email(&input.email)
}
