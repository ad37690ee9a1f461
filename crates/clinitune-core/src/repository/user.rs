//! User repository trait definition.

use clinitune_types::error::RepositoryError;
use clinitune_types::user::User;
use uuid::Uuid;

/// Repository trait for account persistence.
///
/// Implementations live in clinitune-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait UserRepository: Send + Sync {
    /// Create a new account. Fails with `RepositoryError::Conflict` when the
    /// email is already registered.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Lookup by email. Emails are stored lower-cased.
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Every patient account, ordered by name.
    fn list_patients(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    /// Patients whose assigned clinician is `clinician_id`, ordered by name.
    fn list_patients_of(
        &self,
        clinician_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    /// Set the patient's assigned clinician.
    fn assign_clinician(
        &self,
        patient_id: &Uuid,
        clinician_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
