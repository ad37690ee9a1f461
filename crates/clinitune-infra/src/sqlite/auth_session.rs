//! SQLite login session repository.

use chrono::{DateTime, Utc};
use clinitune_core::repository::auth_session::AuthSessionRepository;
use clinitune_types::error::RepositoryError;
use clinitune_types::user::AuthSession;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteAuthSessionRepository {
    pool: DatabasePool,
}

impl SqliteAuthSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AuthSessionRow {
    id: String,
    user_id: String,
    token_hash: String,
    created_at: String,
    expires_at: String,
}

impl AuthSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            token_hash: row.try_get("token_hash")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    fn into_session(self) -> Result<AuthSession, RepositoryError> {
        Ok(AuthSession {
            id: parse_uuid(&self.id, "auth session id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            token_hash: self.token_hash,
            created_at: parse_datetime(&self.created_at)?,
            expires_at: parse_datetime(&self.expires_at)?,
        })
    }
}

impl AuthSessionRepository for SqliteAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO auth_sessions (id, user_id, token_hash, created_at, expires_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.token_hash)
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.expires_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<AuthSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM auth_sessions WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| {
            AuthSessionRow::from_row(&row)
                .map_err(query_error)?
                .into_session()
        })
        .transpose()
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM auth_sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= ?")
            .bind(format_datetime(&now))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }
}
