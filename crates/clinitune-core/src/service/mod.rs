//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports) -- never on concrete infrastructure implementations.

pub mod appointment;
pub mod auth;
pub mod dashboard;
pub mod hash;
pub mod notification;
pub mod patient;
pub mod task;

use std::collections::HashMap;

use clinitune_types::error::{CareError, RepositoryError};
use clinitune_types::user::User;
use uuid::Uuid;

use crate::repository::user::UserRepository;

/// Memoized user-id to display-name lookups for listing joins.
pub(crate) struct NameLookup<'a, U: UserRepository> {
    users: &'a U,
    cache: HashMap<Uuid, Option<String>>,
}

impl<'a, U: UserRepository> NameLookup<'a, U> {
    pub(crate) fn new(users: &'a U) -> Self {
        Self {
            users,
            cache: HashMap::new(),
        }
    }

    pub(crate) async fn name(&mut self, id: &Uuid) -> Result<Option<String>, RepositoryError> {
        if let Some(name) = self.cache.get(id) {
            return Ok(name.clone());
        }
        let name = self.users.get_by_id(id).await?.map(|u| u.name);
        self.cache.insert(*id, name.clone());
        Ok(name)
    }
}

/// Load a patient and check they are assigned to `clinician`.
pub(crate) async fn assigned_patient<U: UserRepository>(
    users: &U,
    clinician: &User,
    patient_id: &Uuid,
) -> Result<User, CareError> {
    let patient = users
        .get_by_id(patient_id)
        .await?
        .filter(User::is_patient)
        .ok_or_else(|| CareError::NotFound("Patient not found".into()))?;
    if patient.assigned_clinician_id != Some(clinician.id) {
        return Err(CareError::Forbidden("Patient is not assigned to you".into()));
    }
    Ok(patient)
}

/// Reject callers that are not clinicians.
pub(crate) fn require_clinician(user: &User) -> Result<(), CareError> {
    if user.is_clinician() {
        Ok(())
    } else {
        Err(CareError::Forbidden("Clinician access required".into()))
    }
}
