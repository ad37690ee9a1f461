//! SHA-256 session token digests.

use sha2::{Digest, Sha256};

use clinitune_core::service::hash::TokenHasher;

/// Lowercase hex SHA-256 of a bearer token. Tokens are random, so no salt.
#[derive(Default)]
pub struct Sha256TokenHasher;

impl Sha256TokenHasher {
    pub fn new() -> Self {
        Self
    }
}

impl TokenHasher for Sha256TokenHasher {
    fn hash_token(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}
