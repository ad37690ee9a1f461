//! Task handlers.
//!
//! Endpoints:
//! - GET   /api/tasks?patientId= - Tasks visible to the caller
//! - POST  /api/tasks            - Assign a task (clinician)
//! - PATCH /api/tasks            - Tick a task on or off (its patient or clinician)

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use clinitune_types::task::{CreateTaskRequest, UpdateTaskRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::PatientFilter;
use crate::state::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<PatientFilter>,
) -> Result<Json<Value>, AppError> {
    let tasks = state.task_service.list(&user, filter.patient_id()?).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let task = state.task_service.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "task": task }))))
}

pub async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<Value>, AppError> {
    let task = state.task_service.set_completed(&user, request).await?;
    Ok(Json(json!({ "task": task })))
}
