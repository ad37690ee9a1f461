//! Risk triage orchestrator for patient chat turns.
//!
//! One call to [`TriageService::send_message`] is one chat turn:
//!
//! 1. persist the patient message
//! 2. on high-risk keywords, escalate the session and page the clinician
//!    before the LLM is involved
//! 3. generate and persist the assistant reply
//! 4. every `analysis_interval` messages (or on a critical turn) ask the LLM
//!    for a structured analysis and fold it into the session
//! 5. notify the clinician when the resulting level is an alert
//!
//! Only failures up to step 3 reach the caller. Steps 2, 4 and 5 log and
//! carry on.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use clinitune_types::chat::{ChatMessage, ChatSession, ChatTranscript, Sender};
use clinitune_types::config::TriageConfig;
use clinitune_types::error::ChatError;
use clinitune_types::llm::{CompletionRequest, GenerationParams, LlmError};
use clinitune_types::notification::{Notification, NotificationCategory};
use clinitune_types::risk::AlertLevel;
use clinitune_types::user::User;

use super::analysis::{self, AnalysisOutcome};
use super::classifier;
use super::prompt;
use super::repository::{self, ChatRepository};
use crate::llm::box_provider::BoxLlmProvider;
use crate::repository::notification::NotificationRepository;

/// Characters of the triggering message quoted in an urgent notification.
const URGENT_PREVIEW_CHARS: usize = 100;

/// Result of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The assistant's reply text.
    pub reply: String,
    /// Session state after the turn.
    pub session: ChatSession,
    /// Whether structured analysis ran this turn.
    pub analyzed: bool,
}

/// Orchestrates chat turns and the risk fields they maintain.
///
/// Generic over the repositories to keep clinitune-core free of storage
/// dependencies. The LLM is optional: without one every turn fails with
/// `LlmError::NotConfigured` before anything is written.
pub struct TriageService<C: ChatRepository, N: NotificationRepository> {
    chats: C,
    notifications: N,
    llm: Option<BoxLlmProvider>,
    params: GenerationParams,
    config: TriageConfig,
}

impl<C: ChatRepository, N: NotificationRepository> TriageService<C, N> {
    pub fn new(
        chats: C,
        notifications: N,
        llm: Option<BoxLlmProvider>,
        params: GenerationParams,
        config: TriageConfig,
    ) -> Self {
        Self {
            chats,
            notifications,
            llm,
            params,
            config,
        }
    }

    pub fn chat_repo(&self) -> &C {
        &self.chats
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    /// Run one chat turn for `patient`.
    #[tracing::instrument(skip(self, patient, text), fields(patient_id = %patient.id))]
    pub async fn send_message(&self, patient: &User, text: &str) -> Result<ChatTurn, ChatError> {
        if !patient.is_patient() {
            return Err(ChatError::Unauthorized("Only patients can chat with the assistant".into()));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::Validation("Missing required fields".into()));
        }
        let llm = self.llm.as_ref().ok_or(LlmError::NotConfigured)?;

        let mut session = repository::find_or_create(&self.chats, &patient.id).await?;
        let mut history = self.chats.get_messages(&session.id).await?;

        let assessment = classifier::classify(text);
        let critical = assessment.is_high();

        let context = prompt::tail(&history, self.config.reply_context_messages).to_vec();
        self.append(&mut session, &mut history, Sender::Patient, text).await?;

        if critical {
            info!(matched = ?assessment.matched_keywords, "high-risk language detected");
            analysis::escalate_to_crisis(&mut session);
            session.last_updated = Utc::now();
            if let Err(e) = self.chats.update_session(&session).await {
                warn!(error = %e, "failed to persist crisis escalation");
            }
            if let Err(e) = self.notify_urgent(patient, text).await {
                warn!(error = %e, "failed to create urgent notification");
            }
        }

        let request = CompletionRequest::new(prompt::reply_prompt(&context, text), self.params.clone());
        let reply = llm.complete(&request).await?.text;
        self.append(&mut session, &mut history, Sender::Ai, &reply).await?;

        session.last_updated = Utc::now();
        self.chats.update_session(&session).await?;

        let interval = self.config.analysis_interval.max(1);
        let analyzed = critical || session.message_count % interval == 0;
        if analyzed {
            if let Err(e) = self
                .analyze(llm, &mut session, &history, critical, patient)
                .await
            {
                warn!(error = %e, "chat analysis failed");
            }
        }

        Ok(ChatTurn {
            reply,
            session,
            analyzed,
        })
    }

    /// Chats visible to `viewer`.
    ///
    /// Patients always see their own chat. Clinicians see the chat of the
    /// requested patient, and nothing when no patient is given.
    pub async fn transcripts_for(
        &self,
        viewer: &User,
        patient_id: Option<Uuid>,
    ) -> Result<Vec<ChatTranscript>, ChatError> {
        let target = if viewer.is_patient() {
            viewer.id
        } else {
            match patient_id {
                Some(id) => id,
                None => return Ok(Vec::new()),
            }
        };

        let Some(session) = self.chats.find_by_patient(&target).await? else {
            return Ok(Vec::new());
        };
        let messages = self.chats.get_messages(&session.id).await?;
        Ok(vec![ChatTranscript { session, messages }])
    }

    async fn append(
        &self,
        session: &mut ChatSession,
        history: &mut Vec<ChatMessage>,
        sender: Sender,
        text: &str,
    ) -> Result<(), ChatError> {
        let message = ChatMessage::new(session.id, sender, text);
        self.chats.save_message(&message).await?;
        session.message_count += 1;
        history.push(message);
        Ok(())
    }

    async fn analyze(
        &self,
        llm: &BoxLlmProvider,
        session: &mut ChatSession,
        history: &[ChatMessage],
        critical: bool,
        patient: &User,
    ) -> Result<(), ChatError> {
        let window = prompt::tail(history, self.config.analysis_window);
        let request = CompletionRequest::new(prompt::analysis_prompt(window), self.params.clone());
        let raw = llm.complete(&request).await?.text;

        let outcome = analysis::parse(&raw);
        if matches!(outcome, AnalysisOutcome::Unparsed(_)) {
            warn!("analysis reply was not valid JSON, falling back to keyword scan");
        }
        analysis::apply(session, outcome, critical, window);
        session.last_updated = Utc::now();
        self.chats.update_session(session).await?;

        debug!(
            alert_level = %session.alert_level,
            emotional_state = %session.emotional_state,
            "chat analysis applied"
        );

        if session.alert_level.is_alert() {
            self.notify_alert(patient, session.alert_level).await?;
        }
        Ok(())
    }

    async fn notify_urgent(&self, patient: &User, text: &str) -> Result<(), ChatError> {
        let Some(clinician_id) = patient.assigned_clinician_id else {
            debug!("patient has no assigned clinician, skipping urgent notification");
            return Ok(());
        };
        let preview: String = text.chars().take(URGENT_PREVIEW_CHARS).collect();
        let notification = Notification::new(
            clinician_id,
            format!("URGENT: {} - Critical Alert", patient.name),
            format!(
                "Patient expressed concerning thoughts: \"{preview}...\" - Immediate attention required"
            ),
            NotificationCategory::AiAlert,
        );
        self.notifications.create(&notification).await?;
        Ok(())
    }

    async fn notify_alert(&self, patient: &User, level: AlertLevel) -> Result<(), ChatError> {
        let Some(clinician_id) = patient.assigned_clinician_id else {
            debug!("patient has no assigned clinician, skipping alert notification");
            return Ok(());
        };
        let notification = Notification::new(
            clinician_id,
            format!("AI Alert: {}", patient.name),
            level.clinician_message(),
            NotificationCategory::for_alert(level),
        );
        self.notifications.create(&notification).await?;
        Ok(())
    }
}
