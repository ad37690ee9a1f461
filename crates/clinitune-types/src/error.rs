use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in clinitune-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to signup, login and session resolution.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),

    #[error("Invalid role. Must be clinician or patient")]
    InvalidRole,

    #[error("User already exists with this email")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Session expired")]
    SessionExpired,

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors from the clinical care services (patients, appointments, tasks,
/// notifications, dashboard).
#[derive(Debug, Error)]
pub enum CareError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors surfaced by the chat turn.
///
/// Only failures before the AI reply is stored reach the caller; analysis
/// failures are logged and swallowed by the orchestrator.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("patient not found")]
    PatientNotFound,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
