//! Appointment scheduling.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use clinitune_types::appointment::{
    Appointment, AppointmentListing, AppointmentStatus, CreateAppointmentRequest,
    DEFAULT_APPOINTMENT_TYPE, UpdateAppointmentRequest,
};
use clinitune_types::error::CareError;
use clinitune_types::notification::{Notification, NotificationCategory};
use clinitune_types::user::User;

use super::{NameLookup, assigned_patient, require_clinician};
use crate::repository::appointment::AppointmentRepository;
use crate::repository::notification::NotificationRepository;
use crate::repository::user::UserRepository;

pub struct AppointmentService<A, U, N>
where
    A: AppointmentRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    appointments: A,
    users: U,
    notifications: N,
}

impl<A, U, N> AppointmentService<A, U, N>
where
    A: AppointmentRepository,
    U: UserRepository,
    N: NotificationRepository,
{
    pub fn new(appointments: A, users: U, notifications: N) -> Self {
        Self {
            appointments,
            users,
            notifications,
        }
    }

    /// Appointments visible to `viewer`, ordered by date.
    ///
    /// Patients get their own with the clinician's name. Clinicians get theirs,
    /// optionally narrowed to one patient, with the patient's name.
    pub async fn list(
        &self,
        viewer: &User,
        patient_id: Option<Uuid>,
    ) -> Result<Vec<AppointmentListing>, CareError> {
        let mut names = NameLookup::new(&self.users);
        let mut listings = Vec::new();

        if viewer.is_patient() {
            for appointment in self.appointments.list_for_patient(&viewer.id).await? {
                let clinician_name = names.name(&appointment.clinician_id).await?;
                listings.push(AppointmentListing {
                    appointment,
                    clinician_name,
                    patient_name: None,
                });
            }
        } else {
            let rows = self
                .appointments
                .list_for_clinician(&viewer.id, patient_id.as_ref())
                .await?;
            for appointment in rows {
                let patient_name = names.name(&appointment.patient_id).await?;
                listings.push(AppointmentListing {
                    appointment,
                    clinician_name: None,
                    patient_name,
                });
            }
        }
        Ok(listings)
    }

    /// Schedule an appointment with one of the clinician's patients and
    /// notify the patient.
    pub async fn create(
        &self,
        clinician: &User,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, CareError> {
        require_clinician(clinician)?;
        let (Some(patient_id), Some(date)) = (request.patient_id, request.date) else {
            return Err(CareError::Validation("Patient ID and date are required".into()));
        };
        let patient = assigned_patient(&self.users, clinician, &patient_id).await?;

        let kind = request
            .kind
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| DEFAULT_APPOINTMENT_TYPE.to_string());
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::now_v7(),
            clinician_id: clinician.id,
            patient_id: patient.id,
            date,
            kind,
            status: AppointmentStatus::Upcoming,
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };
        let appointment = self.appointments.create(&appointment).await?;
        info!(appointment_id = %appointment.id, patient_id = %patient.id, "appointment scheduled");

        let notification = Notification::new(
            patient.id,
            "New appointment scheduled",
            format!(
                "{} scheduled a {} for {}",
                clinician.name,
                appointment.kind,
                appointment.date.format("%Y-%m-%d %H:%M UTC")
            ),
            NotificationCategory::Appointment,
        );
        self.notifications.create(&notification).await?;
        Ok(appointment)
    }

    /// Change the status of one of the clinician's appointments.
    pub async fn update_status(
        &self,
        clinician: &User,
        id: &Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, CareError> {
        require_clinician(clinician)?;
        let status = request
            .status
            .ok_or_else(|| CareError::Validation("Status is required".into()))?;
        let appointment = self
            .appointments
            .get_by_id(id)
            .await?
            .ok_or_else(|| CareError::NotFound("Appointment not found".into()))?;
        if appointment.clinician_id != clinician.id {
            return Err(CareError::Forbidden("Appointment belongs to another clinician".into()));
        }
        Ok(self.appointments.update_status(id, status).await?)
    }
}
