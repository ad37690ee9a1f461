//! Credential hashing traits.
//!
//! Defined in clinitune-core so the auth service can hash passwords and
//! session tokens without coupling to specific algorithms. The Argon2 and
//! SHA-256 adapters live in clinitune-infra.

/// Salted, slow hashing for account passwords.
pub trait CredentialHasher: Send + Sync {
    /// Hash a password into a self-describing PHC string.
    fn hash_password(&self, password: &str) -> Result<String, String>;

    /// Check a password against a stored PHC string. Malformed hashes verify
    /// as `false`.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Fast, unsalted digest for high-entropy session tokens.
pub trait TokenHasher: Send + Sync {
    /// Hex-encoded digest of the token.
    fn hash_token(&self, token: &str) -> String;
}
