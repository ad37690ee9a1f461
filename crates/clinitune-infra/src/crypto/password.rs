//! Argon2id password hashing.
//!
//! Implements the `CredentialHasher` trait from `clinitune-core` using the
//! `argon2` crate (RustCrypto ecosystem). Hashes are stored as PHC strings,
//! which carry the algorithm, parameters and salt alongside the digest.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use uuid::Uuid;

use clinitune_core::service::hash::CredentialHasher;

/// Argon2id implementation of `CredentialHasher` with the crate's default
/// parameters.
#[derive(Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> Result<String, String> {
        // 16 random bytes from the OS RNG via UUIDv4.
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|e| format!("failed to encode salt: {e}"))?;
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| format!("failed to hash password: {e}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("stored password hash is malformed: {e}");
                false
            }
        }
    }
}
