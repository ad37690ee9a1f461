//! Clinician dashboard aggregates.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use uuid::Uuid;

use clinitune_types::appointment::Appointment;
use clinitune_types::chat::ChatSession;
use clinitune_types::dashboard::{
    AgendaItem, AiSummaryEntry, DashboardStats, RecentActivity, StatsRefresh, SummaryTone,
};
use clinitune_types::error::CareError;
use clinitune_types::task::TaskCounts;
use clinitune_types::user::User;

use super::{NameLookup, require_clinician};
use crate::chat::classifier;
use crate::chat::reclassify;
use crate::chat::repository::ChatRepository;
use crate::repository::appointment::AppointmentRepository;
use crate::repository::task::TaskRepository;
use crate::repository::user::UserRepository;

const AGENDA_LIMIT: usize = 5;
const SUMMARY_LIMIT: usize = 3;

/// Start and end of the UTC day containing `now`.
pub fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Whether a chat should count as an alert on the dashboard.
///
/// Chats classified before alert levels existed only have a summary, so the
/// summary text is checked too.
pub fn needs_attention(session: &ChatSession) -> bool {
    session.alert_level.is_alert() || classifier::summary_indicates_concern(&session.summary)
}

/// Badge for a chat summary.
pub fn summary_tone(session: &ChatSession) -> SummaryTone {
    if needs_attention(session) {
        SummaryTone::Alert
    } else if classifier::summary_indicates_improvement(&session.summary) {
        SummaryTone::Positive
    } else {
        SummaryTone::Neutral
    }
}

pub struct DashboardService<U, A, T, C>
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

impl<U, A, T, C> DashboardService<U, A, T, C>
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

    async fn patient_ids(&self, clinician: &User) -> Result<Vec<Uuid>, CareError> {
        Ok(self
            .users
            .list_patients_of(&clinician.id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect())
    }

    async fn today(&self, clinician: &User) -> Result<Vec<Appointment>, CareError> {
        let (start, end) = day_bounds(Utc::now());
        Ok(self
            .appointments
            .list_for_clinician(&clinician.id, None)
            .await?
            .into_iter()
            .filter(|a| a.date >= start && a.date < end)
            .collect())
    }

    pub async fn stats(&self, clinician: &User) -> Result<DashboardStats, CareError> {
        require_clinician(clinician)?;
        let patient_ids = self.patient_ids(clinician).await?;

        let ai_alerts = self
            .chats
            .list_sessions_for_patients(&patient_ids)
            .await?
            .iter()
            .filter(|s| needs_attention(s))
            .count() as u64;

        let mut counts = TaskCounts::default();
        for task in self.tasks.list_for_clinician(&clinician.id, None).await? {
            if patient_ids.contains(&task.patient_id) {
                counts = counts
                    + TaskCounts {
                        total: 1,
                        completed: u64::from(task.completed),
                    };
            }
        }

        Ok(DashboardStats {
            today_appointments: self.today(clinician).await?.len() as u64,
            active_patients: patient_ids.len() as u64,
            ai_alerts,
            completion_rate: counts.completion_rate(),
        })
    }

    pub async fn recent_activity(&self, clinician: &User) -> Result<RecentActivity, CareError> {
        require_clinician(clinician)?;
        let mut names = NameLookup::new(&self.users);

        let mut today_appointments = Vec::new();
        for appointment in self.today(clinician).await?.into_iter().take(AGENDA_LIMIT) {
            let patient_name = names
                .name(&appointment.patient_id)
                .await?
                .unwrap_or_default();
            today_appointments.push(AgendaItem {
                id: appointment.id,
                patient_name,
                time: appointment.date,
                kind: appointment.kind,
                status: appointment.status,
            });
        }

        let patient_ids = self.patient_ids(clinician).await?;
        let sessions = self.chats.list_sessions_for_patients(&patient_ids).await?;
        let mut recent_ai_summaries = Vec::new();
        for session in sessions
            .into_iter()
            .filter(|s| !s.summary.trim().is_empty())
            .take(SUMMARY_LIMIT)
        {
            let patient_name = names.name(&session.patient_id).await?.unwrap_or_default();
            recent_ai_summaries.push(AiSummaryEntry {
                patient_name,
                tone: summary_tone(&session),
                summary: session.summary,
                alert_level: session.alert_level,
                concerns: session.concerns,
                emotional_state: session.emotional_state,
                created_at: session.last_updated,
            });
        }

        Ok(RecentActivity {
            today_appointments,
            recent_ai_summaries,
        })
    }

    /// Re-scan the clinician's patient chats with the keyword classifier.
    pub async fn refresh_stats(&self, clinician: &User) -> Result<StatsRefresh, CareError> {
        require_clinician(clinician)?;
        let patient_ids = self.patient_ids(clinician).await?;
        let report = reclassify::refresh_for_patients(&self.chats, &patient_ids).await?;
        Ok(StatsRefresh {
            updated_chats: report.updated,
            total_alerts: report.total_alerts,
            total_patients: patient_ids.len() as u64,
        })
    }
}
