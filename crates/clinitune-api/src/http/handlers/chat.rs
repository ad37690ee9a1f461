//! AI chat HTTP handlers.
//!
//! Endpoints:
//! - POST /api/ai/chat                   - One chat turn (patients only)
//! - GET  /api/ai/chat?patientId=        - Chat transcripts visible to the caller
//! - POST /api/ai/fix-classifications    - Keyword re-scan of every stored chat

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use clinitune_core::chat::reclassify::fix_classifications;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::extractors::query::PatientFilter;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub patient_id: Option<String>,
}

/// POST /api/ai/chat
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = request.patient_id.as_deref().map(str::trim).unwrap_or_default();
    if request.message.trim().is_empty() || patient_id.is_empty() {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }
    if !user.is_patient() {
        return Err(AppError::Unauthorized(
            "Only patients can chat with the assistant".to_string(),
        ));
    }
    if patient_id != user.id.to_string() {
        return Err(AppError::Forbidden(
            "Patients can only chat as themselves".to_string(),
        ));
    }

    let turn = state
        .triage_service
        .send_message(&user, &request.message)
        .await?;

    Ok(Json(json!({
        "success": true,
        "response": turn.reply,
    })))
}

/// GET /api/ai/chat
pub async fn list_chats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<PatientFilter>,
) -> Result<Json<Value>, AppError> {
    let chats = state
        .triage_service
        .transcripts_for(&user, filter.patient_id()?)
        .await?;
    Ok(Json(json!({ "chats": chats })))
}

/// POST /api/ai/fix-classifications
pub async fn fix_chat_classifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    if !user.is_clinician() {
        return Err(AppError::Forbidden("Clinician access required".to_string()));
    }
    let report = fix_classifications(state.triage_service.chat_repo()).await?;
    Ok(Json(json!({
        "message": format!("Fixed {} chat classifications", report.updated),
        "scanned": report.scanned,
        "updated": report.updated,
        "totalAlerts": report.total_alerts,
    })))
}
