//! Notification inbox handlers. Every endpoint acts on the caller's own inbox.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use clinitune_types::notification::CreateNotificationRequest;

use super::parse_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    let notifications = state.notification_service.list(&user).await?;
    Ok(Json(json!({ "notifications": notifications })))
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let notification = state.notification_service.create(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "notification": notification })),
    ))
}

/// PATCH /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let notification = state.notification_service.mark_read(&user, &id).await?;
    Ok(Json(json!({ "notification": notification })))
}

/// DELETE /api/notifications/clear
pub async fn clear_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    let deleted = state.notification_service.clear(&user).await?;
    Ok(Json(json!({
        "message": "Notifications cleared",
        "deleted": deleted,
    })))
}
