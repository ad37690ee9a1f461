//! Account and session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/auth/signup  - Create an account
//! - POST /api/auth/login   - Issue a session token (also set as a cookie)
//! - POST /api/auth/logout  - Revoke the presented token
//! - GET  /api/auth/session - Resolve the current user

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::json;

use clinitune_types::user::{LoginRequest, SignupRequest};

use crate::http::error::AppError;
use crate::http::extractors::auth::{CurrentUser, SESSION_COOKIE, SessionToken};
use crate::state::AppState;

fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.signup(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let issued = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    let max_age = (issued.expires_at - Utc::now()).num_seconds().max(0);
    let cookie = session_cookie(&issued.token, max_age);
    let redirect = issued.user.role.dashboard_path();

    Ok((
        [(SET_COOKIE, cookie)],
        Json(json!({
            "token": issued.token,
            "user": issued.user,
            "redirect": redirect,
        })),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&token).await?;
    Ok((
        [(SET_COOKIE, session_cookie("", 0))],
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

/// GET /api/auth/session
pub async fn session(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    let redirect = user.role.dashboard_path();
    Json(json!({ "user": user, "redirect": redirect }))
}
