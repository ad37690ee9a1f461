//! User account types for CliniTune.
//!
//! Clinicians and patients share one account table. The role decides which
//! dashboard a user lands on and which API operations they may perform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of an account.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('clinician', 'patient'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Clinician,
    Patient,
}

impl UserRole {
    /// Landing page for this role in the web dashboard.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            UserRole::Clinician => "/dashboard/clinician",
            UserRole::Patient => "/dashboard/patient",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Clinician => write!(f, "clinician"),
            UserRole::Patient => write!(f, "patient"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clinician" => Ok(UserRole::Clinician),
            "patient" => Ok(UserRole::Patient),
            other => Err(format!("invalid user role: '{other}'")),
        }
    }
}

/// A CliniTune account.
///
/// The password hash is never serialized; API responses can return `User`
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: UserRole,
    /// Clinician responsible for this patient (patients only).
    pub assigned_clinician_id: Option<Uuid>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_clinician(&self) -> bool {
        self.role == UserRole::Clinician
    }

    pub fn is_patient(&self) -> bool {
        self.role == UserRole::Patient
    }
}

/// Request body for account creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for attaching a patient to the calling clinician.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPatientRequest {
    #[serde(default)]
    pub patient_email: String,
}

/// Condensed patient reference used in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for PatientRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A login session. Only the SHA-256 digest of the bearer token is stored.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::now_v7(),
            name: "John Doe".to_string(),
            email: "patient@demo.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Patient,
            assigned_clinician_id: None,
            specialization: None,
            license_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Clinician, UserRole::Patient] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_dashboard_path_per_role() {
        assert_eq!(UserRole::Clinician.dashboard_path(), "/dashboard/clinician");
        assert_eq!(UserRole::Patient.dashboard_path(), "/dashboard/patient");
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"assignedClinicianId\":null"));
        assert!(json.contains("\"role\":\"patient\""));
    }

    #[test]
    fn test_auth_session_expiry() {
        let now = Utc::now();
        let session = AuthSession {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            token_hash: "abc".to_string(),
            created_at: now,
            expires_at: now + chrono::Duration::hours(1),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + chrono::Duration::hours(2)));
    }
}
