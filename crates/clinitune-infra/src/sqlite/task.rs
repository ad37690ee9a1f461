//! SQLite task repository implementation.

use chrono::Utc;
use clinitune_core::repository::task::TaskRepository;
use clinitune_types::error::RepositoryError;
use clinitune_types::task::Task;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteTaskRepository {
    pool: DatabasePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct TaskRow {
    id: String,
    title: String,
    description: String,
    patient_id: String,
    clinician_id: String,
    completed: bool,
    due_date: String,
    created_at: String,
    updated_at: String,
}

impl TaskRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            patient_id: row.try_get("patient_id")?,
            clinician_id: row.try_get("clinician_id")?,
            completed: row.try_get("completed")?,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_task(self) -> Result<Task, RepositoryError> {
        Ok(Task {
            id: parse_uuid(&self.id, "task id")?,
            title: self.title,
            description: self.description,
            patient_id: parse_uuid(&self.patient_id, "patient_id")?,
            clinician_id: parse_uuid(&self.clinician_id, "clinician_id")?,
            completed: self.completed,
            due_date: parse_datetime(&self.due_date)?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn rows_to_tasks(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<Task>, RepositoryError> {
    rows.iter()
        .map(|row| TaskRow::from_row(row).map_err(query_error)?.into_task())
        .collect()
}

impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: &Task) -> Result<Task, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO tasks (id, title, description, patient_id, clinician_id, completed,
                                  due_date, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.patient_id.to_string())
        .bind(task.clinician_id.to_string())
        .bind(task.completed)
        .bind(format_datetime(&task.due_date))
        .bind(format_datetime(&task.created_at))
        .bind(format_datetime(&task.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(task.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Task>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| TaskRow::from_row(&row).map_err(query_error)?.into_task())
            .transpose()
    }

    async fn set_completed(&self, id: &Uuid, completed: bool) -> Result<Task, RepositoryError> {
        let result = sqlx::query("UPDATE tasks SET completed = ?, updated_at = ? WHERE id = ?")
            .bind(completed)
            .bind(format_datetime(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn list_for_patient(&self, patient_id: &Uuid) -> Result<Vec<Task>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM tasks WHERE patient_id = ? ORDER BY due_date ASC")
            .bind(patient_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows_to_tasks(&rows)
    }

    async fn list_for_clinician(
        &self,
        clinician_id: &Uuid,
        patient_id: Option<&Uuid>,
    ) -> Result<Vec<Task>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM tasks
               WHERE clinician_id = ?1 AND (?2 IS NULL OR patient_id = ?2)
               ORDER BY due_date ASC"#,
        )
        .bind(clinician_id.to_string())
        .bind(patient_id.map(|id| id.to_string()))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows_to_tasks(&rows)
    }
}
