//! Session authentication extractor.
//!
//! Extracts the session token from:
//! - `Authorization: Bearer <token>` header
//! - `clinitune_session` cookie
//!
//! Tokens are resolved to a user through the auth service, which compares
//! SHA-256 digests against the `auth_sessions` table.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use clinitune_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "clinitune_session";

/// The authenticated caller. Extracting this validates the session token.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)?;
        let user = state.auth_service.authenticate(&token).await?;
        Ok(CurrentUser(user))
    }
}

/// The raw session token presented with a request.
pub struct SessionToken(pub String);

impl FromRequestParts<AppState> for SessionToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_token(parts).map(SessionToken)
    }
}

fn session_token(parts: &Parts) -> Result<String, AppError> {
    if let Some(auth) = parts.headers.get(AUTHORIZATION) {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
    }

    for header in parts.headers.get_all(COOKIE) {
        let Ok(cookies) = header.to_str() else {
            continue;
        };
        if let Some(token) = cookie_value(cookies, SESSION_COOKIE) {
            return Ok(token.to_string());
        }
    }

    Err(AppError::Unauthorized("Unauthorized".to_string()))
}

fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token() {
        let parts = parts(Request::builder().header("authorization", "Bearer abc123"));
        assert_eq!(session_token(&parts).unwrap(), "abc123");
    }

    #[test]
    fn test_cookie_token() {
        let parts = parts(
            Request::builder().header("cookie", "theme=dark; clinitune_session=tok; other=1"),
        );
        assert_eq!(session_token(&parts).unwrap(), "tok");
    }

    #[test]
    fn test_missing_token_is_unauthorized() {
        let parts = parts(Request::builder().header("cookie", "clinitune_session="));
        assert!(matches!(session_token(&parts), Err(AppError::Unauthorized(_))));
    }
}
