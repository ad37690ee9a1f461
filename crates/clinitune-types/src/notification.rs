//! In-app notifications shown in the dashboard notification list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::risk::AlertLevel;

/// What a notification is about, and how loudly the dashboard shows it.
///
/// Serialized as `type` on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Task,
    Appointment,
    AiAlert,
    #[default]
    Info,
    Warning,
    Urgent,
}

impl NotificationCategory {
    /// Severity used for AI alert notifications of a given tier.
    pub fn for_alert(level: AlertLevel) -> Self {
        match level {
            AlertLevel::High => NotificationCategory::Urgent,
            AlertLevel::Medium => NotificationCategory::Warning,
            AlertLevel::Low | AlertLevel::None => NotificationCategory::Info,
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationCategory::Task => write!(f, "task"),
            NotificationCategory::Appointment => write!(f, "appointment"),
            NotificationCategory::AiAlert => write!(f, "ai_alert"),
            NotificationCategory::Info => write!(f, "info"),
            NotificationCategory::Warning => write!(f, "warning"),
            NotificationCategory::Urgent => write!(f, "urgent"),
        }
    }
}

impl FromStr for NotificationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task" => Ok(NotificationCategory::Task),
            "appointment" => Ok(NotificationCategory::Appointment),
            "ai_alert" => Ok(NotificationCategory::AiAlert),
            "info" => Ok(NotificationCategory::Info),
            "warning" => Ok(NotificationCategory::Warning),
            "urgent" => Ok(NotificationCategory::Urgent),
            other => Err(format!("invalid notification type: '{other}'")),
        }
    }
}

/// A notification addressed to a single user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub category: NotificationCategory,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// A new unread notification.
    pub fn new(
        user_id: Uuid,
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            title: title.into(),
            message: message.into(),
            category,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Request body for creating a notification.
///
/// `user_id` defaults to the caller and `category` to `info`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type")]
    pub category: Option<NotificationCategory>,
    pub user_id: Option<Uuid>,
}
