//! Argon2id PIN hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use tracing::warn;

use prishare_core::error::AppError;

/// Hashes and verifies link PINs using Argon2id.
///
/// `verify(p, hash(p))` always holds; the stored value cannot be turned
/// back into the PIN.
#[derive(Debug, Clone)]
pub struct PinHasher;

impl PinHasher {
    /// Creates a new PIN hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a PIN using Argon2id with a random salt.
    pub fn hash_pin(&self, pin: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("PIN hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a PIN attempt against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the PIN matches, `Ok(false)` if not. A stored
    /// value that is not a PHC string is an internal error, not a mismatch.
    pub fn verify_pin(&self, pin: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            warn!(error = %e, "Stored PIN hash is not a PHC string");
            AppError::internal(format!("Invalid PIN hash format: {e}"))
        })?;

        let argon2 = Argon2::default();
        match argon2.verify_password(pin.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!("PIN verification failed: {e}"))),
        }
    }
}

impl Default for PinHasher {
    fn default() -> Self {
        Self::new()
    }
}
