//! SQLite notification repository implementation.

use clinitune_core::repository::notification::NotificationRepository;
use clinitune_types::error::RepositoryError;
use clinitune_types::notification::{Notification, NotificationCategory};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteNotificationRepository {
    pool: DatabasePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct NotificationRow {
    id: String,
    user_id: String,
    title: String,
    message: String,
    category: String,
    read: bool,
    created_at: String,
}

impl NotificationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            category: row.try_get("category")?,
            read: row.try_get("read")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_notification(self) -> Result<Notification, RepositoryError> {
        let category: NotificationCategory =
            self.category.parse().map_err(RepositoryError::Query)?;
        Ok(Notification {
            id: parse_uuid(&self.id, "notification id")?,
            user_id: parse_uuid(&self.user_id, "user_id")?,
            title: self.title,
            message: self.message,
            category,
            read: self.read,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO notifications (id, user_id, title, message, category, read, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(notification.id.to_string())
        .bind(notification.user_id.to_string())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.category.to_string())
        .bind(notification.read)
        .bind(format_datetime(&notification.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(notification.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Notification>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM notifications WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| {
            NotificationRow::from_row(&row)
                .map_err(query_error)?
                .into_notification()
        })
        .transpose()
    }

    async fn list_for_user(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                NotificationRow::from_row(row)
                    .map_err(query_error)?
                    .into_notification()
            })
            .collect()
    }

    async fn mark_read(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }
}
