//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `clinitune-core`. A patient has at most
//! one row in `chat_sessions` (UNIQUE on `patient_id`); messages live in
//! `chat_messages` and `concerns` is stored as a JSON array.

use clinitune_core::chat::repository::ChatRepository;
use clinitune_types::chat::{ChatMessage, ChatSession, Sender};
use clinitune_types::error::RepositoryError;
use clinitune_types::risk::AlertLevel;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatSessionRow {
    id: String,
    patient_id: String,
    summary: String,
    alert_level: String,
    concerns: String,
    emotional_state: String,
    message_count: i64,
    last_updated: String,
    created_at: String,
}

impl ChatSessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            patient_id: row.try_get("patient_id")?,
            summary: row.try_get("summary")?,
            alert_level: row.try_get("alert_level")?,
            concerns: row.try_get("concerns")?,
            emotional_state: row.try_get("emotional_state")?,
            message_count: row.try_get("message_count")?,
            last_updated: row.try_get("last_updated")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<ChatSession, RepositoryError> {
        let alert_level: AlertLevel = self.alert_level.parse().map_err(RepositoryError::Query)?;
        let concerns: Vec<String> = serde_json::from_str(&self.concerns)
            .map_err(|e| RepositoryError::Query(format!("invalid concerns: {e}")))?;

        Ok(ChatSession {
            id: parse_uuid(&self.id, "session id")?,
            patient_id: parse_uuid(&self.patient_id, "patient_id")?,
            summary: self.summary,
            alert_level,
            concerns,
            emotional_state: self.emotional_state,
            message_count: self.message_count as u32,
            last_updated: parse_datetime(&self.last_updated)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct ChatMessageRow {
    id: String,
    session_id: String,
    sender: String,
    text: String,
    timestamp: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sender: Sender = self.sender.parse().map_err(RepositoryError::Query)?;
        Ok(ChatMessage {
            id: parse_uuid(&self.id, "message id")?,
            session_id: parse_uuid(&self.session_id, "session_id")?,
            sender,
            text: self.text,
            timestamp: parse_datetime(&self.timestamp)?,
        })
    }
}

fn rows_to_sessions(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatSession>, RepositoryError> {
    rows.iter()
        .map(|row| {
            ChatSessionRow::from_row(row)
                .map_err(query_error)?
                .into_session()
        })
        .collect()
}

fn concerns_json(concerns: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(concerns)
        .map_err(|e| RepositoryError::Query(format!("failed to encode concerns: {e}")))
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn find_by_patient(
        &self,
        patient_id: &Uuid,
    ) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE patient_id = ?")
            .bind(patient_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|row| {
            ChatSessionRow::from_row(&row)
                .map_err(query_error)?
                .into_session()
        })
        .transpose()
    }

    async fn create_session(&self, session: &ChatSession) -> Result<ChatSession, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO chat_sessions (id, patient_id, summary, alert_level, concerns,
                                          emotional_state, message_count, last_updated, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(session.id.to_string())
        .bind(session.patient_id.to_string())
        .bind(&session.summary)
        .bind(session.alert_level.to_string())
        .bind(concerns_json(&session.concerns)?)
        .bind(&session.emotional_state)
        .bind(session.message_count as i64)
        .bind(format_datetime(&session.last_updated))
        .bind(format_datetime(&session.created_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(session.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "patient {} already has a chat session",
                    session.patient_id
                )))
            }
            Err(e) => Err(query_error(e)),
        }
    }

    async fn update_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE chat_sessions
               SET summary = ?, alert_level = ?, concerns = ?, emotional_state = ?, last_updated = ?
               WHERE id = ?"#,
        )
        .bind(&session.summary)
        .bind(session.alert_level.to_string())
        .bind(concerns_json(&session.concerns)?)
        .bind(&session.emotional_state)
        .bind(format_datetime(&session.last_updated))
        .bind(session.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(query_error)?;

        sqlx::query(
            r#"INSERT INTO chat_messages (id, session_id, sender, text, timestamp)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.sender.to_string())
        .bind(&message.text)
        .bind(format_datetime(&message.timestamp))
        .execute(&mut *tx)
        .await
        .map_err(query_error)?;

        sqlx::query("UPDATE chat_sessions SET message_count = message_count + 1 WHERE id = ?")
            .bind(message.session_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        tx.commit().await.map_err(query_error)
    }

    async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE session_id = ? ORDER BY timestamp ASC, rowid ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter()
            .map(|row| {
                ChatMessageRow::from_row(row)
                    .map_err(query_error)?
                    .into_message()
            })
            .collect()
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM chat_sessions ORDER BY last_updated DESC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows_to_sessions(&rows)
    }

    async fn list_sessions_for_patients(
        &self,
        patient_ids: &[Uuid],
    ) -> Result<Vec<ChatSession>, RepositoryError> {
        if patient_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; patient_ids.len()].join(", ");
        let sql = format!(
            "SELECT * FROM chat_sessions WHERE patient_id IN ({placeholders}) ORDER BY last_updated DESC"
        );
        let mut query = sqlx::query(&sql);
        for id in patient_ids {
            query = query.bind(id.to_string());
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows_to_sessions(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::testing::{make_user, test_pool};
    use crate::sqlite::user::SqliteUserRepository;
    use clinitune_core::chat::repository::find_or_create;
    use clinitune_core::repository::user::UserRepository;
    use clinitune_types::user::{User, UserRole};

    async fn setup() -> (SqliteChatRepository, Vec<User>) {
        let pool = test_pool().await;
        let users = SqliteUserRepository::new(pool.clone());
        let mut patients = Vec::new();
        for (name, email) in [("John Doe", "patient@demo.com"), ("Mike Chen", "mike@demo.com")] {
            let user = make_user(name, email, UserRole::Patient);
            users.create(&user).await.unwrap();
            patients.push(user);
        }
        (SqliteChatRepository::new(pool), patients)
    }

    #[tokio::test]
    async fn test_find_or_create_is_one_per_patient() {
        let (repo, patients) = setup().await;
        let first = find_or_create(&repo, &patients[0].id).await.unwrap();
        let second = find_or_create(&repo, &patients[0].id).await.unwrap();
        assert_eq!(first.id, second.id);

        let err = repo
            .create_session(&ChatSession::new(patients[0].id))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_save_message_bumps_count_and_keeps_order() {
        let (repo, patients) = setup().await;
        let session = find_or_create(&repo, &patients[0].id).await.unwrap();

        for (sender, text) in [
            (Sender::Patient, "hello"),
            (Sender::Ai, "hi, how are you?"),
            (Sender::Patient, "tired"),
        ] {
            repo.save_message(&ChatMessage::new(session.id, sender, text))
                .await
                .unwrap();
        }

        let messages = repo.get_messages(&session.id).await.unwrap();
        assert_eq!(
            messages.iter().map(|m| m.text.as_str()).collect::<Vec<_>>(),
            vec!["hello", "hi, how are you?", "tired"]
        );
        let stored = repo.find_by_patient(&patients[0].id).await.unwrap().unwrap();
        assert_eq!(stored.message_count, 3);
    }

    #[tokio::test]
    async fn test_update_session_persists_derived_fields_only() {
        let (repo, patients) = setup().await;
        let mut session = find_or_create(&repo, &patients[0].id).await.unwrap();
        repo.save_message(&ChatMessage::new(session.id, Sender::Patient, "hi"))
            .await
            .unwrap();

        session.summary = "Patient reports low mood".to_string();
        session.alert_level = AlertLevel::Medium;
        session.concerns = vec!["Low mood".to_string(), "Sleep".to_string()];
        session.emotional_state = "distressed".to_string();
        session.message_count = 99;
        repo.update_session(&session).await.unwrap();

        let stored = repo.find_by_patient(&patients[0].id).await.unwrap().unwrap();
        assert_eq!(stored.alert_level, AlertLevel::Medium);
        assert_eq!(stored.concerns, session.concerns);
        assert_eq!(stored.emotional_state, "distressed");
        assert_eq!(stored.message_count, 1);

        let missing = ChatSession::new(patients[1].id);
        assert!(matches!(
            repo.update_session(&missing).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_sessions_for_patients() {
        let (repo, patients) = setup().await;
        for patient in &patients {
            find_or_create(&repo, &patient.id).await.unwrap();
        }

        assert_eq!(repo.list_sessions().await.unwrap().len(), 2);
        let one = repo
            .list_sessions_for_patients(&[patients[1].id])
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].patient_id, patients[1].id);
        assert!(repo.list_sessions_for_patients(&[]).await.unwrap().is_empty());
    }
}
