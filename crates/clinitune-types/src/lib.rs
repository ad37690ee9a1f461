//! Shared domain types for CliniTune.
//!
//! This crate contains the core domain types used across the CliniTune
//! service: users, chat sessions and their risk fields, notifications,
//! appointments, tasks, LLM request shapes, configuration, and the error
//! enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod appointment;
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod llm;
pub mod notification;
pub mod risk;
pub mod task;
pub mod user;
