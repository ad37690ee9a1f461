//! Keyword risk classifier.
//!
//! Case-insensitive substring matching against three fixed lists. Substring
//! matching is deliberately naive: "die" also matches inside "diet".

use clinitune_types::risk::{AlertLevel, RiskAssessment};

pub const HIGH_RISK_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "end it all",
    "no point",
    "hopeless",
    "worthless",
    "dying",
    "dieing",
    "die",
    "death",
    "want to die",
    "better off dead",
    "harm myself",
    "hurt myself",
    "cut myself",
    "overdose",
    "pills",
    "can't go on",
    "give up",
    "no reason to live",
    "everyone would be better",
];

pub const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "depressed",
    "sad",
    "anxious",
    "panic",
    "scared",
    "worried",
    "crying",
    "empty",
    "numb",
    "alone",
    "isolated",
    "dark thoughts",
    "can't cope",
    "breaking down",
    "falling apart",
    "losing control",
    "desperate",
    "trapped",
    "suffocating",
    "drowning",
    "heavy",
    "burden",
];

pub const LOW_RISK_KEYWORDS: &[&str] = &[
    "tired",
    "stressed",
    "overwhelmed",
    "frustrated",
    "upset",
    "down",
    "low",
    "blue",
    "off",
    "not great",
    "struggling",
    "difficult",
    "hard time",
    "rough day",
    "tough",
    "challenging",
];

/// Words in a stored summary that mark it as worrying on the dashboard.
const CONCERN_MARKERS: &[&str] = &["crisis", "urgent", "concern", "alert", "distressed"];

const IMPROVEMENT_MARKERS: &[&str] = &["improvement", "positive", "better"];

fn matches(text: &str, keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| text.contains(*k))
        .map(|k| k.to_string())
        .collect()
}

/// Classify text into the highest tier with at least one keyword hit.
pub fn classify(text: &str) -> RiskAssessment {
    let lower = text.to_lowercase();
    let tiers = [
        (AlertLevel::High, HIGH_RISK_KEYWORDS),
        (AlertLevel::Medium, MEDIUM_RISK_KEYWORDS),
        (AlertLevel::Low, LOW_RISK_KEYWORDS),
    ];

    for (level, keywords) in tiers {
        let matched = matches(&lower, keywords);
        if !matched.is_empty() {
            return RiskAssessment {
                level,
                matched_keywords: matched,
            };
        }
    }
    RiskAssessment::none()
}

/// True when the text contains any high-risk keyword.
pub fn has_critical_content(text: &str) -> bool {
    classify(text).is_high()
}

pub fn summary_indicates_concern(text: &str) -> bool {
    let lower = text.to_lowercase();
    matches!(classify(&lower).level, AlertLevel::High | AlertLevel::Medium)
        || CONCERN_MARKERS.iter().any(|m| lower.contains(m))
}

pub fn summary_indicates_improvement(text: &str) -> bool {
    let lower = text.to_lowercase();
    IMPROVEMENT_MARKERS.iter().any(|m| lower.contains(m))
}
