//! HTTP/REST API layer for CliniTune.
//!
//! Axum-based JSON API under `/api/` with session-token authentication
//! (bearer header or cookie), `{"error": ...}` error bodies, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
