//! Patient chat and risk triage.
//!
//! - `repository`: `ChatRepository` trait for sessions and messages
//! - `classifier`: fixed keyword lists mapping text to a risk tier
//! - `prompt`: reply and analysis prompt construction
//! - `analysis`: parsing of the structured analysis reply
//! - `triage`: `TriageService`, the per-message orchestrator
//! - `reclassify`: batch keyword re-scan of stored chats

pub mod analysis;
pub mod classifier;
pub mod prompt;
pub mod reclassify;
pub mod repository;
pub mod triage;
