//! Therapeutic task assignment and completion.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use clinitune_types::error::CareError;
use clinitune_types::notification::{Notification, NotificationCategory};
use clinitune_types::task::{CreateTaskRequest, Task, TaskListing, UpdateTaskRequest};
use clinitune_types::user::User;

use super::{NameLookup, assigned_patient, require_clinician};
use crate::repository::notification::NotificationRepository;
use crate::repository::task::TaskRepository;
use crate::repository::user::UserRepository;

pub struct TaskService<T, U, N>
where
    T: TaskRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    tasks: T,
    users: U,
    notifications: N,
}

impl<T, U, N> TaskService<T, U, N>
where
    T: TaskRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    pub fn new(tasks: T, users: U, notifications: N) -> Self {
        Self {
            tasks,
            users,
            notifications,
        }
    }

    /// Tasks visible to `viewer`, ordered by due date. Same visibility rules
    /// as appointments.
    pub async fn list(
        &self,
        viewer: &User,
        patient_id: Option<Uuid>,
    ) -> Result<Vec<TaskListing>, CareError> {
        let mut names = NameLookup::new(&self.users);
        let mut listings = Vec::new();

        if viewer.is_patient() {
            for task in self.tasks.list_for_patient(&viewer.id).await? {
                let clinician_name = names.name(&task.clinician_id).await?;
                listings.push(TaskListing {
                    task,
                    clinician_name,
                    patient_name: None,
                });
            }
        } else {
            for task in self
                .tasks
                .list_for_clinician(&viewer.id, patient_id.as_ref())
                .await?
            {
                let patient_name = names.name(&task.patient_id).await?;
                listings.push(TaskListing {
                    task,
                    clinician_name: None,
                    patient_name,
                });
            }
        }
        Ok(listings)
    }

    /// Assign a task to one of the clinician's patients and notify them.
    pub async fn create(&self, clinician: &User, request: CreateTaskRequest) -> Result<Task, CareError> {
        require_clinician(clinician)?;
        let title = request.title.trim();
        let description = request.description.trim();
        let (Some(patient_id), Some(due_date)) = (request.patient_id, request.due_date) else {
            return Err(CareError::Validation("All fields are required".into()));
        };
        if title.is_empty() || description.is_empty() {
            return Err(CareError::Validation("All fields are required".into()));
        }
        let patient = assigned_patient(&self.users, clinician, &patient_id).await?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: description.to_string(),
            patient_id: patient.id,
            clinician_id: clinician.id,
            completed: false,
            due_date,
            created_at: now,
            updated_at: now,
        };
        let task = self.tasks.create(&task).await?;
        info!(task_id = %task.id, patient_id = %patient.id, "task assigned");

        let notification = Notification::new(
            patient.id,
            "New task assigned",
            format!("{} assigned you: {}", clinician.name, task.title),
            NotificationCategory::Task,
        );
        self.notifications.create(&notification).await?;
        Ok(task)
    }

    /// Tick a task on or off. Only the task's patient or clinician may.
    pub async fn set_completed(&self, caller: &User, request: UpdateTaskRequest) -> Result<Task, CareError> {
        let (Some(task_id), Some(completed)) = (request.task_id, request.completed) else {
            return Err(CareError::Validation(
                "Task ID and completed status are required".into(),
            ));
        };
        let task = self
            .tasks
            .get_by_id(&task_id)
            .await?
            .ok_or_else(|| CareError::NotFound("Task not found".into()))?;
        let owner = if caller.is_patient() {
            task.patient_id
        } else {
            task.clinician_id
        };
        if owner != caller.id {
            return Err(CareError::Forbidden("Task belongs to someone else".into()));
        }
        Ok(self.tasks.set_completed(&task_id, completed).await?)
    }
}
