//! Notification inbox operations.

use uuid::Uuid;

use clinitune_types::error::CareError;
use clinitune_types::notification::{CreateNotificationRequest, Notification};
use clinitune_types::user::User;

use crate::repository::notification::NotificationRepository;

/// Number of notifications returned by [`NotificationService::list`].
pub const INBOX_LIMIT: i64 = 20;

pub struct NotificationService<N: NotificationRepository> {
    notifications: N,
}

impl<N: NotificationRepository> NotificationService<N> {
    pub fn new(notifications: N) -> Self {
        Self { notifications }
    }

    /// The caller's latest notifications, newest first.
    pub async fn list(&self, user: &User) -> Result<Vec<Notification>, CareError> {
        Ok(self.notifications.list_for_user(&user.id, INBOX_LIMIT).await?)
    }

    /// Create a notification, addressed to the caller unless the request names a user.
    pub async fn create(
        &self,
        caller: &User,
        request: CreateNotificationRequest,
    ) -> Result<Notification, CareError> {
        if request.title.trim().is_empty() || request.message.trim().is_empty() {
            return Err(CareError::Validation("Title and message are required".into()));
        }
        let notification = Notification::new(
            request.user_id.unwrap_or(caller.id),
            request.title,
            request.message,
            request.category.unwrap_or_default(),
        );
        Ok(self.notifications.create(&notification).await?)
    }

    /// Mark one of the caller's notifications as read.
    pub async fn mark_read(&self, caller: &User, id: &Uuid) -> Result<Notification, CareError> {
        let mut notification = self
            .notifications
            .get_by_id(id)
            .await?
            .filter(|n| n.user_id == caller.id)
            .ok_or_else(|| CareError::NotFound("Notification not found".into()))?;
        self.notifications.mark_read(id).await?;
        notification.read = true;
        Ok(notification)
    }

    /// Delete all of the caller's notifications.
    pub async fn clear(&self, caller: &User) -> Result<u64, CareError> {
        Ok(self.notifications.delete_for_user(&caller.id).await?)
    }
}
