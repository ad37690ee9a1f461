//! SQLite user repository implementation.

use clinitune_core::repository::user::UserRepository;
use clinitune_types::error::RepositoryError;
use clinitune_types::user::{User, UserRole};
use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    assigned_clinician_id: Option<String>,
    specialization: Option<String>,
    license_number: Option<String>,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: row.try_get("role")?,
            assigned_clinician_id: row.try_get("assigned_clinician_id")?,
            specialization: row.try_get("specialization")?,
            license_number: row.try_get("license_number")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let role: UserRole = self.role.parse().map_err(RepositoryError::Query)?;
        let assigned_clinician_id = self
            .assigned_clinician_id
            .as_deref()
            .map(|id| parse_uuid(id, "assigned_clinician_id"))
            .transpose()?;

        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
            assigned_clinician_id,
            specialization: self.specialization,
            license_number: self.license_number,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn rows_to_users(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<User>, RepositoryError> {
    rows.iter()
        .map(|row| UserRow::from_row(row).map_err(query_error)?.into_user())
        .collect()
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, name, email, password_hash, role, assigned_clinician_id,
                                  specialization, license_number, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(user.email.to_lowercase())
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(user.assigned_clinician_id.map(|id| id.to_string()))
        .bind(&user.specialization)
        .bind(&user.license_number)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => {
                let mut created = user.clone();
                created.email = created.email.to_lowercase();
                Ok(created)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("email '{}' is already registered", user.email)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| UserRow::from_row(&row).map_err(query_error)?.into_user())
            .transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| UserRow::from_row(&row).map_err(query_error)?.into_user())
            .transpose()
    }

    async fn list_patients(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM users WHERE role = 'patient' ORDER BY name ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows_to_users(&rows)
    }

    async fn list_patients_of(&self, clinician_id: &Uuid) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM users WHERE role = 'patient' AND assigned_clinician_id = ? ORDER BY name ASC",
        )
        .bind(clinician_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows_to_users(&rows)
    }

    async fn assign_clinician(
        &self,
        patient_id: &Uuid,
        clinician_id: &Uuid,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET assigned_clinician_id = ?, updated_at = ? WHERE id = ? AND role = 'patient'",
        )
        .bind(clinician_id.to_string())
        .bind(format_datetime(&Utc::now()))
        .bind(patient_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
