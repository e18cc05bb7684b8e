//! services/api/src/auth/password.rs
//!
//! Password hashing and verification using Argon2id with a per-account salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use movieflix_core::ports::{AuthError, AuthResult};

/// Hash a password for storage. Every call draws a fresh random salt.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Unexpected(format!("Failed to hash password: {e}")))?
        .to_string();
    Ok(password_hash)
}

/// Verify a password against a stored hash.
///
/// The comparison inside the argon2 crate is constant-time; any mismatch
/// collapses into `InvalidCredentials`.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<()> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Unexpected(format!("Stored hash is malformed: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
