//! Risk tiers attached to a patient's chat session.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Clinician-facing risk tier for a patient's chat.
///
/// Variants are declared in ascending severity so `Ord` compares by risk.
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (alert_level IN ('none', 'low', 'medium', 'high'))`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl AlertLevel {
    pub fn is_alert(&self) -> bool {
        *self != AlertLevel::None
    }

    /// Notification body sent to the clinician for this tier.
    pub fn clinician_message(&self) -> &'static str {
        match self {
            AlertLevel::High => "High priority: Patient may need immediate attention",
            AlertLevel::Medium => "Medium priority: Patient showing signs of distress",
            AlertLevel::Low => "Low priority: Patient experiencing mild emotional concerns",
            AlertLevel::None => "Patient needs attention",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertLevel::None => write!(f, "none"),
            AlertLevel::Low => write!(f, "low"),
            AlertLevel::Medium => write!(f, "medium"),
            AlertLevel::High => write!(f, "high"),
        }
    }
}

impl FromStr for AlertLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(AlertLevel::None),
            "low" => Ok(AlertLevel::Low),
            "medium" => Ok(AlertLevel::Medium),
            "high" => Ok(AlertLevel::High),
            other => Err(format!("invalid alert level: '{other}'")),
        }
    }
}

/// Result of a keyword scan: the tier and the keywords of that tier that hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub level: AlertLevel,
    pub matched_keywords: Vec<String>,
}

impl RiskAssessment {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.level == AlertLevel::High
    }
}
