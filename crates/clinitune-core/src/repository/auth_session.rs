//! Login session repository trait definition.

use chrono::{DateTime, Utc};
use clinitune_types::error::RepositoryError;
use clinitune_types::user::AuthSession;

/// Repository trait for login sessions, keyed by the token's SHA-256 digest.
pub trait AuthSessionRepository: Send + Sync {
    fn create(
        &self,
        session: &AuthSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthSession>, RepositoryError>> + Send;

    /// Remove a session. Removing an unknown session is not an error.
    fn delete_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove every session that expired before `now`. Returns the count removed.
    fn delete_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
