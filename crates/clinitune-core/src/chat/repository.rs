//! ChatRepository trait definition.
//!
//! Provides persistence for the one-per-patient chat session and its
//! append-only transcript. Follows the same RPITIT pattern as the other
//! repositories.

use clinitune_types::chat::{ChatMessage, ChatSession};
use clinitune_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for chat session and message persistence.
///
/// Implementations live in clinitune-infra (e.g., `SqliteChatRepository`).
/// There is no concurrency control: two turns for the same patient may
/// interleave their writes.
pub trait ChatRepository: Send + Sync {
    /// Get the patient's session, if one exists.
    fn find_by_patient(
        &self,
        patient_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Create a new chat session. Fails with `Conflict` if the patient
    /// already has one.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Persist the derived fields of a session (summary, alert level,
    /// concerns, emotional state, last updated). `message_count` is owned
    /// by [`save_message`](Self::save_message) and is not written here.
    fn update_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append a message and atomically bump the session's message count.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Messages of a session, ordered by timestamp ascending.
    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Every session, most recently updated first.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Sessions of the given patients, most recently updated first.
    fn list_sessions_for_patients(
        &self,
        patient_ids: &[Uuid],
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;
}

/// Get the patient's session, creating an empty one on first use.
///
/// A concurrent first turn may insert between the lookup and the create;
/// the loser picks up the winner's session.
pub async fn find_or_create<C: ChatRepository>(
    repo: &C,
    patient_id: &Uuid,
) -> Result<ChatSession, RepositoryError> {
    if let Some(session) = repo.find_by_patient(patient_id).await? {
        return Ok(session);
    }
    match repo.create_session(&ChatSession::new(*patient_id)).await {
        Err(RepositoryError::Conflict(_)) => repo
            .find_by_patient(patient_id)
            .await?
            .ok_or(RepositoryError::NotFound),
        other => other,
    }
}
