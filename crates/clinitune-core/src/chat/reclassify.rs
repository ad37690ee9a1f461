//! Batch keyword re-scan of stored chats.
//!
//! Chats created before the keyword lists grew (or whose analysis was lost)
//! can sit at a lower alert level than their transcript warrants. A re-scan
//! only ever raises levels.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use clinitune_types::chat::{ChatMessage, ChatSession};
use clinitune_types::dashboard::ReclassifyReport;
use clinitune_types::error::RepositoryError;
use clinitune_types::risk::AlertLevel;

use super::analysis;
use super::classifier;
use super::repository::ChatRepository;

pub const DISTRESSED_EMOTIONAL_STATE: &str = "distressed";

pub const DISTRESS_CONCERNS: [&str; 2] = ["Depression symptoms", "Emotional distress"];

/// Raise a session's level from its transcript and summary.
///
/// Returns `true` when the session changed.
pub fn reclassify(session: &mut ChatSession, messages: &[ChatMessage]) -> bool {
    let mut corpus = messages
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    corpus.push(' ');
    corpus.push_str(&session.summary);

    match classifier::classify(&corpus).level {
        AlertLevel::High if session.alert_level <= AlertLevel::Low => {
            analysis::escalate_to_crisis(session);
            true
        }
        AlertLevel::Medium if session.alert_level == AlertLevel::None => {
            session.alert_level = AlertLevel::Medium;
            session.emotional_state = DISTRESSED_EMOTIONAL_STATE.to_string();
            session.concerns = DISTRESS_CONCERNS.iter().map(|c| c.to_string()).collect();
            true
        }
        _ => false,
    }
}

async fn rescan<C: ChatRepository>(
    chats: &C,
    sessions: Vec<ChatSession>,
) -> Result<ReclassifyReport, RepositoryError> {
    let mut report = ReclassifyReport::default();
    for mut session in sessions {
        report.scanned += 1;
        let messages = chats.get_messages(&session.id).await?;
        if reclassify(&mut session, &messages) {
            session.last_updated = Utc::now();
            chats.update_session(&session).await?;
            report.updated += 1;
        }
        if session.alert_level.is_alert() {
            report.total_alerts += 1;
        }
    }
    Ok(report)
}

/// Re-scan every stored chat.
pub async fn fix_classifications<C: ChatRepository>(
    chats: &C,
) -> Result<ReclassifyReport, RepositoryError> {
    let sessions = chats.list_sessions().await?;
    let report = rescan(chats, sessions).await?;
    info!(scanned = report.scanned, updated = report.updated, "chat classifications fixed");
    Ok(report)
}

/// Re-scan the chats of the given patients.
pub async fn refresh_for_patients<C: ChatRepository>(
    chats: &C,
    patient_ids: &[Uuid],
) -> Result<ReclassifyReport, RepositoryError> {
    let sessions = chats.list_sessions_for_patients(patient_ids).await?;
    let report = rescan(chats, sessions).await?;
    info!(
        patients = patient_ids.len(),
        updated = report.updated,
        alerts = report.total_alerts,
        "patient chat stats refreshed"
    );
    Ok(report)
}
