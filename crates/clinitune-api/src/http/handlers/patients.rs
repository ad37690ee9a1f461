//! Clinician-facing patient handlers.
//!
//! Endpoints:
//! - GET  /api/patients        - Assigned patients with session and alert summary
//! - GET  /api/patients/all    - Every patient next to the assigned ones
//! - POST /api/patients/assign - Attach a patient by email
//! - GET  /api/patients/{id}   - One assigned patient

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use clinitune_types::dashboard::PatientDirectory;
use clinitune_types::user::AssignPatientRequest;

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

pub async fn list_patients(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    let patients = state.patient_service.overview(&user).await?;
    Ok(Json(json!({ "patients": patients })))
}

pub async fn patient_directory(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PatientDirectory>, AppError> {
    Ok(Json(state.patient_service.directory(&user).await?))
}

pub async fn assign_patient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<AssignPatientRequest>,
) -> Result<Json<Value>, AppError> {
    let patient = state.patient_service.assign(&user, request).await?;
    Ok(Json(json!({
        "message": "Patient assigned successfully",
        "patient": patient,
    })))
}

pub async fn get_patient(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let patient = state.patient_service.get(&user, &id).await?;
    Ok(Json(json!({ "patient": patient })))
}
