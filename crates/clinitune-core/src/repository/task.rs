//! Task repository trait definition.

use clinitune_types::error::RepositoryError;
use clinitune_types::task::Task;
use uuid::Uuid;

/// Repository trait for therapeutic task persistence.
///
/// All list operations return tasks ordered by due date ascending.
pub trait TaskRepository: Send + Sync {
    fn create(
        &self,
        task: &Task,
    ) -> impl std::future::Future<Output = Result<Task, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Task>, RepositoryError>> + Send;

    fn set_completed(
        &self,
        id: &Uuid,
        completed: bool,
    ) -> impl std::future::Future<Output = Result<Task, RepositoryError>> + Send;

    fn list_for_patient(
        &self,
        patient_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, RepositoryError>> + Send;

    /// A clinician's tasks, optionally narrowed to one patient.
    fn list_for_clinician(
        &self,
        clinician_id: &Uuid,
        patient_id: Option<&Uuid>,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, RepositoryError>> + Send;
}
