//! In-memory repositories and a scripted LLM provider for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use clinitune_types::appointment::{Appointment, AppointmentStatus};
use clinitune_types::chat::{ChatMessage, ChatSession};
use clinitune_types::error::RepositoryError;
use clinitune_types::llm::{CompletionRequest, CompletionResponse, LlmError};
use clinitune_types::notification::Notification;
use clinitune_types::task::Task;
use clinitune_types::user::{AuthSession, User, UserRole};

use crate::chat::repository::ChatRepository;
use crate::llm::provider::LlmProvider;
use crate::repository::appointment::AppointmentRepository;
use crate::repository::auth_session::AuthSessionRepository;
use crate::repository::notification::NotificationRepository;
use crate::repository::task::TaskRepository;
use crate::repository::user::UserRepository;

pub fn user(name: &str, email: &str, role: UserRole) -> User {
    User {
        id: Uuid::now_v7(),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: "plain:password".to_string(),
        role,
        assigned_clinician_id: None,
        specialization: None,
        license_number: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A patient named "John Doe" assigned to a fresh clinician id.
pub fn patient_with_clinician() -> (User, Uuid) {
    let clinician_id = Uuid::now_v7();
    let mut patient = user("John Doe", "patient@demo.com", UserRole::Patient);
    patient.assigned_clinician_id = Some(clinician_id);
    (patient, clinician_id)
}

/// Replays canned results in order and records every prompt it saw.
#[derive(Clone)]
pub struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-1"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse));
        next.map(|text| CompletionResponse {
            text,
            model: "scripted-1".to_string(),
            finish_reason: Some("STOP".to_string()),
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryChatRepository {
    sessions: Arc<Mutex<Vec<ChatSession>>>,
    messages: Arc<Mutex<Vec<ChatMessage>>>,
}

impl ChatRepository for InMemoryChatRepository {
    async fn find_by_patient(&self, patient_id: &Uuid) -> Result<Option<ChatSession>, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.patient_id == *patient_id)
            .cloned())
    }

    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.iter().any(|s| s.patient_id == session.patient_id) {
            return Err(RepositoryError::Conflict("chat session exists".to_string()));
        }
        sessions.push(session.clone());
        Ok(session.clone())
    }

    async fn update_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let stored = sessions
            .iter_mut()
            .find(|s| s.id == session.id)
            .ok_or(RepositoryError::NotFound)?;
        stored.summary = session.summary.clone();
        stored.alert_level = session.alert_level;
        stored.concerns = session.concerns.clone();
        stored.emotional_state = session.emotional_state.clone();
        stored.last_updated = session.last_updated;
        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        let stored = sessions
            .iter_mut()
            .find(|s| s.id == message.session_id)
            .ok_or(RepositoryError::NotFound)?;
        stored.message_count += 1;
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == *session_id)
            .cloned()
            .collect())
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap().clone();
        sessions.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(sessions)
    }

    async fn list_sessions_for_patients(
        &self,
        patient_ids: &[Uuid],
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        let mut sessions: Vec<ChatSession> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| patient_ids.contains(&s.patient_id))
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(sessions)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryNotificationRepository {
    rows: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    /// Every stored notification in insertion order.
    pub fn all(&self) -> Vec<Notification> {
        self.rows.lock().unwrap().clone()
    }
}

impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<Notification, RepositoryError> {
        self.rows.lock().unwrap().push(notification.clone());
        Ok(notification.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Notification>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|n| n.id == *id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let mut rows: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == *user_id)
            .cloned()
            .collect();
        rows.reverse();
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn mark_read(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|n| n.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        row.read = true;
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.user_id != *user_id);
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    rows: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(users)),
        }
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!("email {}", user.email)));
        }
        rows.push(user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == *id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_patients(&self) -> Result<Vec<User>, RepositoryError> {
        let mut rows: Vec<User> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.is_patient())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn list_patients_of(&self, clinician_id: &Uuid) -> Result<Vec<User>, RepositoryError> {
        let mut rows: Vec<User> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.is_patient() && u.assigned_clinician_id == Some(*clinician_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn assign_clinician(
        &self,
        patient_id: &Uuid,
        clinician_id: &Uuid,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == *patient_id)
            .ok_or(RepositoryError::NotFound)?;
        row.assigned_clinician_id = Some(*clinician_id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAuthSessionRepository {
    rows: Arc<Mutex<Vec<AuthSession>>>,
}

impl AuthSessionRepository for InMemoryAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> Result<(), RepositoryError> {
        self.rows.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> Result<Option<AuthSession>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token_hash == token_hash)
            .cloned())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), RepositoryError> {
        self.rows.lock().unwrap().retain(|s| s.token_hash != token_hash);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| !s.is_expired(now));
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAppointmentRepository {
    rows: Arc<Mutex<Vec<Appointment>>>,
}

impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment, RepositoryError> {
        self.rows.lock().unwrap().push(appointment.clone());
        Ok(appointment.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Appointment>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|a| a.id == *id).cloned())
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn list_for_patient(&self, patient_id: &Uuid) -> Result<Vec<Appointment>, RepositoryError> {
        let mut rows: Vec<Appointment> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.patient_id == *patient_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);
        Ok(rows)
    }

    async fn list_for_clinician(
        &self,
        clinician_id: &Uuid,
        patient_id: Option<&Uuid>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut rows: Vec<Appointment> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.clinician_id == *clinician_id)
            .filter(|a| patient_id.is_none_or(|p| a.patient_id == *p))
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.date);
        Ok(rows)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    rows: Arc<Mutex<Vec<Task>>>,
}

impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: &Task) -> Result<Task, RepositoryError> {
        self.rows.lock().unwrap().push(task.clone());
        Ok(task.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Task>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|t| t.id == *id).cloned())
    }

    async fn set_completed(&self, id: &Uuid, completed: bool) -> Result<Task, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        row.completed = completed;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn list_for_patient(&self, patient_id: &Uuid) -> Result<Vec<Task>, RepositoryError> {
        let mut rows: Vec<Task> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.patient_id == *patient_id)
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.due_date);
        Ok(rows)
    }

    async fn list_for_clinician(
        &self,
        clinician_id: &Uuid,
        patient_id: Option<&Uuid>,
    ) -> Result<Vec<Task>, RepositoryError> {
        let mut rows: Vec<Task> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.clinician_id == *clinician_id)
            .filter(|t| patient_id.is_none_or(|p| t.patient_id == *p))
            .cloned()
            .collect();
        rows.sort_by_key(|t| t.due_date);
        Ok(rows)
    }
}
