//! SQLite appointment repository implementation.

use chrono::Utc;
use clinitune_core::repository::appointment::AppointmentRepository;
use clinitune_types::appointment::{Appointment, AppointmentStatus};
use clinitune_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteAppointmentRepository {
    pool: DatabasePool,
}

impl SqliteAppointmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_many(
        &self,
        sql: &str,
        binds: &[String],
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                AppointmentRow::from_row(row)
                    .map_err(query_error)?
                    .into_appointment()
            })
            .collect()
    }
}

struct AppointmentRow {
    id: String,
    clinician_id: String,
    patient_id: String,
    date: String,
    kind: String,
    status: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl AppointmentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            clinician_id: row.try_get("clinician_id")?,
            patient_id: row.try_get("patient_id")?,
            date: row.try_get("date")?,
            kind: row.try_get("type")?,
            status: row.try_get("status")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_appointment(self) -> Result<Appointment, RepositoryError> {
        let status: AppointmentStatus = self.status.parse().map_err(RepositoryError::Query)?;
        Ok(Appointment {
            id: parse_uuid(&self.id, "appointment id")?,
            clinician_id: parse_uuid(&self.clinician_id, "clinician_id")?,
            patient_id: parse_uuid(&self.patient_id, "patient_id")?,
            date: parse_datetime(&self.date)?,
            kind: self.kind,
            status,
            notes: self.notes,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

impl AppointmentRepository for SqliteAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO appointments (id, clinician_id, patient_id, date, type, status, notes,
                                         created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(appointment.id.to_string())
        .bind(appointment.clinician_id.to_string())
        .bind(appointment.patient_id.to_string())
        .bind(format_datetime(&appointment.date))
        .bind(&appointment.kind)
        .bind(appointment.status.to_string())
        .bind(&appointment.notes)
        .bind(format_datetime(&appointment.created_at))
        .bind(format_datetime(&appointment.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(appointment.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Appointment>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM appointments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| {
            AppointmentRow::from_row(&row)
                .map_err(query_error)?
                .into_appointment()
        })
        .transpose()
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, RepositoryError> {
        let result = sqlx::query("UPDATE appointments SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.to_string())
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

    async fn list_for_patient(&self, patient_id: &Uuid) -> Result<Vec<Appointment>, RepositoryError> {
        self.fetch_many(
            "SELECT * FROM appointments WHERE patient_id = ? ORDER BY date ASC",
            &[patient_id.to_string()],
        )
        .await
    }

    async fn list_for_clinician(
        &self,
        clinician_id: &Uuid,
        patient_id: Option<&Uuid>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        match patient_id {
            Some(patient_id) => {
                self.fetch_many(
                    "SELECT * FROM appointments WHERE clinician_id = ? AND patient_id = ? ORDER BY date ASC",
                    &[clinician_id.to_string(), patient_id.to_string()],
                )
                .await
            }
            None => {
                self.fetch_many(
                    "SELECT * FROM appointments WHERE clinician_id = ? ORDER BY date ASC",
                    &[clinician_id.to_string()],
                )
                .await
            }
        }
    }
}
