//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (clinitune-infra) implements. The core crate never depends on any
//! specific storage technology. The chat store lives beside the triage
//! logic in [`crate::chat::repository`].

pub mod appointment;
pub mod auth_session;
pub mod notification;
pub mod task;
pub mod user;
