//! Credential hashing for CliniTune.
//!
//! - `password`: Argon2id password hashing (PHC strings)
//! - `token`: SHA-256 digests of session tokens

pub mod password;
pub mod token;
