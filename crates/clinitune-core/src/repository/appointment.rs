//! Appointment repository trait definition.

use clinitune_types::appointment::{Appointment, AppointmentStatus};
use clinitune_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for appointment persistence.
///
/// All list operations return appointments ordered by date ascending.
pub trait AppointmentRepository: Send + Sync {
    fn create(
        &self,
        appointment: &Appointment,
    ) -> impl std::future::Future<Output = Result<Appointment, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Appointment>, RepositoryError>> + Send;

    fn update_status(
        &self,
        id: &Uuid,
        status: AppointmentStatus,
    ) -> impl std::future::Future<Output = Result<Appointment, RepositoryError>> + Send;

    fn list_for_patient(
        &self,
        patient_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Appointment>, RepositoryError>> + Send;

    /// A clinician's appointments, optionally narrowed to one patient.
    fn list_for_clinician(
        &self,
        clinician_id: &Uuid,
        patient_id: Option<&Uuid>,
    ) -> impl std::future::Future<Output = Result<Vec<Appointment>, RepositoryError>> + Send;
}
