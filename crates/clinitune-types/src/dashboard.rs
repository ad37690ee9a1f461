//! Read models for the clinician dashboard.
//!
//! These are aggregates computed on request; none of them are persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::appointment::AppointmentStatus;
use crate::risk::AlertLevel;
use crate::user::PatientRef;

/// Headline numbers shown at the top of the clinician dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_appointments: u64,
    pub active_patients: u64,
    pub ai_alerts: u64,
    pub completion_rate: u32,
}

/// Whether a patient currently needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    Alert,
    Active,
}

/// One row of the clinician's patient list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientOverview {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub last_session: Option<DateTime<Utc>>,
    pub next_session: Option<DateTime<Utc>>,
    pub completion_rate: u32,
    pub ai_alerts: u32,
    pub status: PatientStatus,
}

/// Every patient in the system next to the ones assigned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDirectory {
    pub all_patients: Vec<PatientRef>,
    pub assigned_patients: Vec<PatientRef>,
    pub clinician_info: ClinicianInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicianInfo {
    pub id: Uuid,
    pub name: String,
    pub assigned_count: usize,
}

/// An appointment on today's agenda.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: Uuid,
    pub patient_name: String,
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: AppointmentStatus,
}

/// How the dashboard badges an AI summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryTone {
    Alert,
    Positive,
    Neutral,
}

/// The latest AI chat summary for one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummaryEntry {
    pub patient_name: String,
    pub summary: String,
    #[serde(rename = "alertType")]
    pub tone: SummaryTone,
    pub alert_level: AlertLevel,
    pub concerns: Vec<String>,
    pub emotional_state: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub today_appointments: Vec<AgendaItem>,
    #[serde(rename = "recentAISummaries")]
    pub recent_ai_summaries: Vec<AiSummaryEntry>,
}

/// Outcome of a keyword re-scan over stored chats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclassifyReport {
    pub scanned: u64,
    pub updated: u64,
    /// Chats whose level is not `none` after the scan.
    pub total_alerts: u64,
}

/// Result of re-scanning one clinician's patient chats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRefresh {
    pub updated_chats: u64,
    pub total_alerts: u64,
    pub total_patients: u64,
}
