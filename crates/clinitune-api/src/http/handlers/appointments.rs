//! Appointment handlers.
//!
//! Endpoints:
//! - GET   /api/appointments?patientId= - Appointments visible to the caller
//! - POST  /api/appointments            - Schedule (clinician)
//! - PATCH /api/appointments/{id}       - Change status (owning clinician)

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use clinitune_types::appointment::{CreateAppointmentRequest, UpdateAppointmentRequest};

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::PatientFilter;
use crate::state::AppState;

pub async fn list_appointments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<PatientFilter>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .appointment_service
        .list(&user, filter.patient_id()?)
        .await?;
    Ok(Json(json!({ "appointments": appointments })))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = state.appointment_service.create(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "appointment": appointment })),
    ))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let appointment = state
        .appointment_service
        .update_status(&user, &id, request)
        .await?;
    Ok(Json(json!({ "appointment": appointment })))
}
