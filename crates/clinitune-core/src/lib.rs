//! Business logic and repository trait definitions for CliniTune.
//!
//! This crate defines the "ports" (repository traits and the LLM provider
//! trait) that the infrastructure layer implements, plus the chat risk
//! triage orchestrator and the care services built on top of them. It
//! depends only on `clinitune-types` -- never on `clinitune-infra` or any
//! database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
