//! Clinician-facing patient roster.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use clinitune_types::appointment::AppointmentStatus;
use clinitune_types::dashboard::{ClinicianInfo, PatientDirectory, PatientOverview, PatientStatus};
use clinitune_types::error::CareError;
use clinitune_types::task::TaskCounts;
use clinitune_types::user::{AssignPatientRequest, PatientRef, User};

use super::{assigned_patient, require_clinician};
use crate::chat::repository::ChatRepository;
use crate::repository::appointment::AppointmentRepository;
use crate::repository::task::TaskRepository;
use crate::repository::user::UserRepository;

pub struct PatientService<U, A, T, C>
where
    U: UserRepository,
    A: AppointmentRepository,
    T: TaskRepository,
    C: ChatRepository,
{
    users: U,
    appointments: A,
    tasks: T,
    chats: C,
}

impl<U, A, T, C> PatientService<U, A, T, C>
where
    U: UserRepository,
    A: AppointmentRepository,
    T: TaskRepository,
    C: ChatRepository,
{
    pub fn new(users: U, appointments: A, tasks: T, chats: C) -> Self {
        Self {
            users,
            appointments,
            tasks,
            chats,
        }
    }

    /// The clinician's patients with session, task and alert summaries.
    pub async fn overview(&self, clinician: &User) -> Result<Vec<PatientOverview>, CareError> {
        require_clinician(clinician)?;
        let now = Utc::now();
        let mut rows = Vec::new();

        for patient in self.users.list_patients_of(&clinician.id).await? {
            let appointments = self
                .appointments
                .list_for_clinician(&clinician.id, Some(&patient.id))
                .await?;
            let last_session = appointments
                .iter()
                .filter(|a| a.date <= now)
                .map(|a| a.date)
                .max();
            let next_session = appointments
                .iter()
                .filter(|a| a.date >= now && a.status == AppointmentStatus::Upcoming)
                .map(|a| a.date)
                .min();

            let tasks = self
                .tasks
                .list_for_clinician(&clinician.id, Some(&patient.id))
                .await?;
            let counts = TaskCounts {
                total: tasks.len() as u64,
                completed: tasks.iter().filter(|t| t.completed).count() as u64,
            };

            let alerting = self
                .chats
                .find_by_patient(&patient.id)
                .await?
                .is_some_and(|s| s.alert_level.is_alert());
            let ai_alerts = u32::from(alerting);

            rows.push(PatientOverview {
                id: patient.id,
                name: patient.name,
                email: patient.email,
                last_session,
                next_session,
                completion_rate: counts.completion_rate(),
                ai_alerts,
                status: if alerting {
                    PatientStatus::Alert
                } else {
                    PatientStatus::Active
                },
            });
        }
        Ok(rows)
    }

    /// Every patient next to the clinician's own.
    pub async fn directory(&self, clinician: &User) -> Result<PatientDirectory, CareError> {
        require_clinician(clinician)?;
        let all_patients: Vec<PatientRef> = self
            .users
            .list_patients()
            .await?
            .iter()
            .map(PatientRef::from)
            .collect();
        let assigned_patients: Vec<PatientRef> = self
            .users
            .list_patients_of(&clinician.id)
            .await?
            .iter()
            .map(PatientRef::from)
            .collect();

        Ok(PatientDirectory {
            clinician_info: ClinicianInfo {
                id: clinician.id,
                name: clinician.name.clone(),
                assigned_count: assigned_patients.len(),
            },
            all_patients,
            assigned_patients,
        })
    }

    /// Attach a patient, found by email, to the calling clinician.
    pub async fn assign(
        &self,
        clinician: &User,
        request: AssignPatientRequest,
    ) -> Result<PatientRef, CareError> {
        require_clinician(clinician)?;
        let email = request.patient_email.trim().to_lowercase();
        if email.is_empty() {
            return Err(CareError::Validation("Patient email is required".into()));
        }
        let patient = self
            .users
            .get_by_email(&email)
            .await?
            .filter(User::is_patient)
            .ok_or_else(|| CareError::NotFound("Patient not found".into()))?;

        match patient.assigned_clinician_id {
            Some(id) if id == clinician.id => {
                return Err(CareError::Validation("Patient is already assigned to you".into()));
            }
            Some(_) => {
                return Err(CareError::Conflict(
                    "Patient is already assigned to another clinician".into(),
                ));
            }
            None => {}
        }

        self.users.assign_clinician(&patient.id, &clinician.id).await?;
        info!(patient_id = %patient.id, clinician_id = %clinician.id, "patient assigned");
        Ok(PatientRef::from(&patient))
    }

    /// One of the clinician's patients.
    pub async fn get(&self, clinician: &User, patient_id: &Uuid) -> Result<User, CareError> {
        require_clinician(clinician)?;
        assigned_patient(&self.users, clinician, patient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        InMemoryAppointmentRepository, InMemoryChatRepository, InMemoryTaskRepository,
        InMemoryUserRepository, user,
    };
    use chrono::Duration;
    use clinitune_types::chat::ChatSession;
    use clinitune_types::risk::AlertLevel;
    use clinitune_types::task::Task;
    use clinitune_types::user::UserRole;

    type Service = PatientService<
        InMemoryUserRepository,
        InMemoryAppointmentRepository,
        InMemoryTaskRepository,
        InMemoryChatRepository,
    >;

    struct Fixture {
        service: Service,
        tasks: InMemoryTaskRepository,
        chats: InMemoryChatRepository,
        clinician: User,
        patient: User,
        unassigned: User,
    }

    fn fixture() -> Fixture {
        let clinician = user("Dr. Sarah Johnson", "doctor@demo.com", UserRole::Clinician);
        let mut patient = user("John Doe", "patient@demo.com", UserRole::Patient);
        patient.assigned_clinician_id = Some(clinician.id);
        let unassigned = user("Jane Smith", "jane@demo.com", UserRole::Patient);
        let users = InMemoryUserRepository::with(vec![
            clinician.clone(),
            patient.clone(),
            unassigned.clone(),
        ]);
        let tasks = InMemoryTaskRepository::default();
        let chats = InMemoryChatRepository::default();
        Fixture {
            service: PatientService::new(
                users,
                InMemoryAppointmentRepository::default(),
                tasks.clone(),
                chats.clone(),
            ),
            tasks,
            chats,
            clinician,
            patient,
            unassigned,
        }
    }

    fn task(f: &Fixture, completed: bool) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::now_v7(),
            title: "Breathing".to_string(),
            description: "Box breathing".to_string(),
            patient_id: f.patient.id,
            clinician_id: f.clinician.id,
            completed,
            due_date: now + Duration::days(1),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_overview_reports_alerts_and_completion() {
        let f = fixture();
        for completed in [true, true, false] {
            f.tasks.create(&task(&f, completed)).await.unwrap();
        }
        let mut session = ChatSession::new(f.patient.id);
        session.alert_level = AlertLevel::Medium;
        f.chats.create_session(&session).await.unwrap();

        let rows = f.service.overview(&f.clinician).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].completion_rate, 67);
        assert_eq!(rows[0].ai_alerts, 1);
        assert_eq!(rows[0].status, PatientStatus::Alert);
        assert!(rows[0].next_session.is_none());
    }

    #[tokio::test]
    async fn test_directory_lists_all_and_assigned() {
        let f = fixture();
        let dir = f.service.directory(&f.clinician).await.unwrap();
        assert_eq!(dir.all_patients.len(), 2);
        assert_eq!(dir.assigned_patients.len(), 1);
        assert_eq!(dir.clinician_info.assigned_count, 1);
    }

    #[tokio::test]
    async fn test_assign_rules() {
        let f = fixture();
        let req = |email: &str| AssignPatientRequest {
            patient_email: email.to_string(),
        };

        assert!(matches!(
            f.service.assign(&f.clinician, req("nobody@demo.com")).await,
            Err(CareError::NotFound(_))
        ));
        assert!(matches!(
            f.service.assign(&f.clinician, req("patient@demo.com")).await,
            Err(CareError::Validation(_))
        ));

        let other = user("Dr. Other", "other@demo.com", UserRole::Clinician);
        assert!(matches!(
            f.service.assign(&other, req("patient@demo.com")).await,
            Err(CareError::Conflict(_))
        ));

        let assigned = f.service.assign(&f.clinician, req("JANE@demo.com")).await.unwrap();
        assert_eq!(assigned.id, f.unassigned.id);
        assert_eq!(f.service.directory(&f.clinician).await.unwrap().assigned_patients.len(), 2);
    }

    #[tokio::test]
    async fn test_get_requires_assignment() {
        let f = fixture();
        assert_eq!(
            f.service.get(&f.clinician, &f.patient.id).await.unwrap().id,
            f.patient.id
        );
        assert!(matches!(
            f.service.get(&f.clinician, &f.unassigned.id).await,
            Err(CareError::Forbidden(_))
        ));
    }
}
