//! Query parameter extractors for list endpoints.

use serde::Deserialize;
use uuid::Uuid;

use crate::http::error::AppError;

/// `?patientId=` filter accepted by the chat, appointment and task listings.
///
/// An empty value is the same as no filter.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PatientFilter {
    pub patient_id: Option<String>,
}

impl PatientFilter {
    pub fn patient_id(&self) -> Result<Option<Uuid>, AppError> {
        match self.patient_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::Validation(format!("Invalid patient ID: {raw}"))),
        }
    }
}
