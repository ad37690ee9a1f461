//! Application error type mapping to HTTP status codes and `{"error": ...}` bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use clinitune_types::error::{AuthError, CareError, ChatError, RepositoryError};
use clinitune_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Signup, login and session errors.
    Auth(AuthError),
    /// Patient, appointment, task, notification and dashboard errors.
    Care(CareError),
    /// Chat turn errors, including the LLM taxonomy.
    Chat(ChatError),
    /// Authentication failure.
    Unauthorized(String),
    /// Caller is authenticated but not allowed.
    Forbidden(String),
    /// Validation error.
    Validation(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<CareError> for AppError {
    fn from(e: CareError) -> Self {
        AppError::Care(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Care(CareError::Repository(e))
    }
}

fn repository_status(e: &RepositoryError) -> (StatusCode, String) {
    match e {
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        other => {
            tracing::error!(error = %other, "repository failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
        }
    }
}

/// User-safe status and message for an LLM failure during a chat turn.
fn llm_status(e: &LlmError) -> (StatusCode, &'static str) {
    match e {
        LlmError::NotConfigured => (
            StatusCode::SERVICE_UNAVAILABLE,
            "AI service is not configured. Please contact your administrator.",
        ),
        LlmError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            "AI service authentication failed.",
        ),
        LlmError::QuotaExceeded => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable. Please try again later.",
        ),
        LlmError::SafetyBlocked(_) => (
            StatusCode::BAD_REQUEST,
            "Message blocked by safety filters. Please rephrase your message.",
        ),
        LlmError::Network(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Network error. Please check your connection.",
        ),
        LlmError::EmptyResponse | LlmError::Provider { .. } | LlmError::Deserialization(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to connect to AI service.",
        ),
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Auth(e) => match e {
                AuthError::MissingFields
                | AuthError::WeakPassword(_)
                | AuthError::InvalidRole
                | AuthError::EmailTaken => (StatusCode::BAD_REQUEST, e.to_string()),
                AuthError::InvalidCredentials
                | AuthError::Unauthenticated
                | AuthError::SessionExpired => (StatusCode::UNAUTHORIZED, e.to_string()),
                AuthError::Hashing(msg) => {
                    tracing::error!(error = %msg, "password hashing failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
                }
                AuthError::Repository(e) => repository_status(e),
            },
            AppError::Care(e) => match e {
                CareError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CareError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CareError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                CareError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CareError::Repository(e) => repository_status(e),
            },
            AppError::Chat(e) => match e {
                ChatError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ChatError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
                ChatError::PatientNotFound => {
                    (StatusCode::NOT_FOUND, "Patient not found".to_string())
                }
                ChatError::Llm(llm) => {
                    tracing::warn!(error = %llm, "AI chat failed");
                    let (status, message) = llm_status(llm);
                    (status, message.to_string())
                }
                ChatError::Repository(e) => repository_status(e),
            },
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
