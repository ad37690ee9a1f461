//! HTTP request handlers for the REST API.

pub mod appointments;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod patients;
pub mod tasks;

use uuid::Uuid;

use crate::http::error::AppError;

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_id(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid ID: {s}")))
}
