//! Account signup, login, and session resolution.
//!
//! Tokens are random, returned once at login, and stored only as a digest.
//! A session resolves to its user until `expires_at`.

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use clinitune_types::error::{AuthError, RepositoryError};
use clinitune_types::user::{AuthSession, SignupRequest, User, UserRole};

use crate::repository::auth_session::AuthSessionRepository;
use crate::repository::user::UserRepository;
use crate::service::hash::{CredentialHasher, TokenHasher};

pub const MIN_PASSWORD_LEN: usize = 6;

/// A freshly issued login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Bearer token. Not recoverable after this point.
    pub token: String,
    pub user: User,
    pub expires_at: chrono::DateTime<Utc>,
}

pub struct AuthService<U, S, H, T>
where
    U: UserRepository,
    S: AuthSessionRepository,
    H: CredentialHasher,
    T: TokenHasher,
{
    users: U,
    sessions: S,
    hasher: H,
    token_hasher: T,
    session_ttl: Duration,
}

impl<U, S, H, T> AuthService<U, S, H, T>
where
    U: UserRepository,
    S: AuthSessionRepository,
    H: CredentialHasher,
    T: TokenHasher,
{
    pub fn new(users: U, sessions: S, hasher: H, token_hasher: T, session_ttl_hours: i64) -> Self {
        Self {
            users,
            sessions,
            hasher,
            token_hasher,
            session_ttl: Duration::hours(session_ttl_hours.max(1)),
        }
    }

    /// Create an account after validating the request.
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AuthError> {
        let name = request.name.trim();
        let email = request.email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() || request.password.is_empty() || request.role.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }
        let role: UserRole = request.role.parse().map_err(|_| AuthError::InvalidRole)?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self
            .hasher
            .hash_password(&request.password)
            .map_err(AuthError::Hashing)?;
        let now = Utc::now();
        let is_clinician = role == UserRole::Clinician;
        let user = User {
            id: Uuid::now_v7(),
            name: name.to_string(),
            email,
            password_hash,
            role,
            assigned_clinician_id: None,
            specialization: request.specialization.filter(|_| is_clinician),
            license_number: request.license_number.filter(|_| is_clinician),
            created_at: now,
            updated_at: now,
        };

        let user = self.users.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Repository(other),
        })?;
        info!(user_id = %user.id, role = %user.role, "account created");
        Ok(user)
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !self.hasher.verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = new_token();
        let now = Utc::now();
        let session = AuthSession {
            id: Uuid::now_v7(),
            user_id: user.id,
            token_hash: self.token_hasher.hash_token(&token),
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions.create(&session).await?;
        info!(user_id = %user.id, "login");

        Ok(IssuedSession {
            token,
            user,
            expires_at: session.expires_at,
        })
    }

    /// Forget a token. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions
            .delete_by_token_hash(&self.token_hasher.hash_token(token))
            .await?;
        Ok(())
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let token_hash = self.token_hasher.hash_token(token);
        let session = self
            .sessions
            .get_by_token_hash(&token_hash)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        if session.is_expired(Utc::now()) {
            self.sessions.delete_by_token_hash(&token_hash).await?;
            return Err(AuthError::SessionExpired);
        }
        self.users
            .get_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Drop expired sessions. Returns how many were removed.
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        Ok(self.sessions.delete_expired(Utc::now()).await?)
    }
}

/// 256 bits of randomness from two v4 UUIDs, hex encoded.
fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
