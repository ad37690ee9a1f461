//! Chat session and message types for the patient wellness assistant.
//!
//! Each patient owns exactly one chat session. The session carries the
//! append-only transcript plus the derived risk fields that the triage
//! orchestrator maintains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::risk::AlertLevel;

/// Emotional state assigned to a fresh session.
pub const DEFAULT_EMOTIONAL_STATE: &str = "stable";

/// Author of a chat message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('patient', 'ai'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Patient,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Patient => write!(f, "patient"),
            Sender::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patient" => Ok(Sender::Patient),
            "ai" => Ok(Sender::Ai),
            other => Err(format!("invalid message sender: '{other}'")),
        }
    }
}

/// A patient's chat session with its derived risk classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// Clinical summary produced by the latest analysis pass.
    pub summary: String,
    pub alert_level: AlertLevel,
    pub concerns: Vec<String>,
    pub emotional_state: String,
    /// Number of messages in the transcript (patient and ai).
    pub message_count: u32,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// A fresh, empty session for a patient.
    pub fn new(patient_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            patient_id,
            summary: String::new(),
            alert_level: AlertLevel::None,
            concerns: Vec::new(),
            emotional_state: DEFAULT_EMOTIONAL_STATE.to_string(),
            message_count: 0,
            last_updated: now,
            created_at: now,
        }
    }
}

/// A single message within a chat session, ordered by `timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(session_id: Uuid, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// `sender: text`, the line format used in LLM prompts.
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.sender, self.text)
    }
}

/// A session together with its full transcript, as returned by `GET /api/ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTranscript {
    #[serde(flatten)]
    pub session: ChatSession,
    pub messages: Vec<ChatMessage>,
}
