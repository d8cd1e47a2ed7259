// ============================
// crates/authd-lib/src/auth/token.rs
// ============================
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
/** Secure token generation for session identifiers.
Tokens are drawn from OS-provided entropy so they cannot be guessed or
derived from timestamps. */
use rand::{rngs::OsRng, RngCore};

/// Token size in bytes (32 bytes = 256 bits of entropy)
const TOKEN_BYTES: usize = 32;

/** Generate a cryptographically secure random session token.
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secure_token() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation() {
        let token1 = generate_secure_token();
        let token2 = generate_secure_token();

        assert_ne!(token1, token2);

        // 32 bytes of entropy encoded in base64, should be about 43 chars
        assert!(token1.len() >= 42);
    }
}
