//! Therapeutic task types assigned by clinicians to patients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A homework-style task a clinician assigns to a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub patient_id: Uuid,
    pub clinician_id: Uuid,
    pub completed: bool,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task joined with the name of the other party.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListing {
    #[serde(flatten)]
    pub task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinician_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

/// Request body for assigning a task.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub patient_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request body for ticking a task on or off.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub task_id: Option<Uuid>,
    pub completed: Option<bool>,
}

/// Per-patient task completion counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u64,
    pub completed: u64,
}

impl TaskCounts {
    /// Completion percentage rounded to the nearest integer; 0 with no tasks.
    pub fn completion_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

impl std::ops::Add for TaskCounts {
    type Output = TaskCounts;

    fn add(self, rhs: TaskCounts) -> TaskCounts {
        TaskCounts {
            total: self.total + rhs.total,
            completed: self.completed + rhs.completed,
        }
    }
}
