//! Infrastructure layer for CliniTune.
//!
//! Contains implementations of the ports defined in `clinitune-core`:
//! SQLite storage, the Gemini LLM provider, and the credential hashers
//! (Argon2id passwords, SHA-256 session tokens). Also loads `config.toml`
//! from the data directory.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
