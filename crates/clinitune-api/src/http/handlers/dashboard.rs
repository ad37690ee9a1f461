//! Clinician dashboard endpoints.
//!
//! - GET  /api/dashboard/stats           - Headline counters
//! - GET  /api/dashboard/recent-activity - Today's agenda and latest AI summaries
//! - POST /api/dashboard/refresh-stats   - Re-scan the caller's patient chats

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use clinitune_types::dashboard::{DashboardStats, RecentActivity};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

pub async fn stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.dashboard_service.stats(&user).await?))
}

pub async fn recent_activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<RecentActivity>, AppError> {
    Ok(Json(state.dashboard_service.recent_activity(&user).await?))
}

pub async fn refresh_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    let refresh = state.dashboard_service.refresh_stats(&user).await?;
    Ok(Json(json!({
        "message": "Stats refreshed",
        "updatedChats": refresh.updated_chats,
        "totalAlerts": refresh.total_alerts,
        "totalPatients": refresh.total_patients,
    })))
}
