//! Notification repository trait definition.

use clinitune_types::error::RepositoryError;
use clinitune_types::notification::Notification;
use uuid::Uuid;

/// Repository trait for notification persistence.
pub trait NotificationRepository: Send + Sync {
    fn create(
        &self,
        notification: &Notification,
    ) -> impl std::future::Future<Output = Result<Notification, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Notification>, RepositoryError>> + Send;

    /// A user's notifications, newest first.
    fn list_for_user(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Notification>, RepositoryError>> + Send;

    /// Flag a notification as read. `RepositoryError::NotFound` if missing.
    fn mark_read(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete all of a user's notifications. Returns the count removed.
    fn delete_for_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
