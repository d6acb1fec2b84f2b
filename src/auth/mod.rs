//! Credential handling: password hashing and session tokens.
//!
//! Passwords are stored as argon2id PHC strings. Session tokens are random
//! UUIDs handed to the browser; only their SHA-256 digest is persisted, so a
//! leaked database does not reveal live sessions.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Hash a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a plaintext password against a stored PHC string.
///
/// Malformed stored hashes never verify.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Generate a fresh opaque session token.
pub fn generate_session_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Digest under which a session token is stored.
pub fn session_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
