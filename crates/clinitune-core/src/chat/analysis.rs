//! Structured analysis parsing and risk resolution.
//!
//! The analysis LLM call is asked for a JSON object. This module turns its
//! raw reply into an [`AnalysisOutcome`] and folds that outcome into a
//! session's risk fields, applying the keyword override and fallback rules.

use serde::Deserialize;

use clinitune_types::chat::{ChatMessage, ChatSession, DEFAULT_EMOTIONAL_STATE};
use clinitune_types::risk::AlertLevel;

use super::classifier;
use super::prompt;

/// Concerns recorded when crisis language is detected.
pub const CRISIS_CONCERNS: [&str; 3] = ["Suicidal ideation", "Self-harm risk", "Crisis situation"];

pub const CRITICAL_EMOTIONAL_STATE: &str = "critical";

pub const NEUTRAL_EMOTIONAL_STATE: &str = "neutral";

pub const DEFAULT_SUMMARY: &str = "Patient engaged in conversation";

/// A well-formed analysis reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub summary: String,
    pub alert_level: AlertLevel,
    pub concerns: Vec<String>,
    pub emotional_state: String,
}

/// What came back from the analysis call.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Parsed(AnalysisReport),
    /// Reply was not usable JSON; carries the raw text.
    Unparsed(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    summary: Option<String>,
    alert_level: Option<String>,
    concerns: Option<Vec<String>>,
    emotional_state: Option<String>,
}

/// Remove a surrounding markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse an analysis reply, applying field defaults.
///
/// An alert level outside `none|low|medium|high` makes the whole reply
/// unusable, same as malformed JSON.
pub fn parse(raw: &str) -> AnalysisOutcome {
    let unparsed = || AnalysisOutcome::Unparsed(raw.to_string());

    let Ok(report) = serde_json::from_str::<RawReport>(strip_code_fence(raw)) else {
        return unparsed();
    };

    let alert_level = match report.alert_level.as_deref() {
        None | Some("") => AlertLevel::None,
        Some(level) => match level.parse() {
            Ok(level) => level,
            Err(_) => return unparsed(),
        },
    };

    AnalysisOutcome::Parsed(AnalysisReport {
        summary: report
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        alert_level,
        concerns: report.concerns.unwrap_or_default(),
        emotional_state: report
            .emotional_state
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMOTIONAL_STATE.to_string()),
    })
}

/// Force a session into the crisis state.
pub fn escalate_to_crisis(session: &mut ChatSession) {
    session.alert_level = AlertLevel::High;
    session.emotional_state = CRITICAL_EMOTIONAL_STATE.to_string();
    session.concerns = CRISIS_CONCERNS.iter().map(|c| c.to_string()).collect();
}

/// Fold an analysis outcome into the session's risk fields.
///
/// `critical` is whether the current turn's message hit a high-risk keyword.
/// A critical turn can never end below `High`.
pub fn apply(
    session: &mut ChatSession,
    outcome: AnalysisOutcome,
    critical: bool,
    window: &[ChatMessage],
) {
    match outcome {
        AnalysisOutcome::Parsed(report) => {
            session.summary = report.summary;
            let downgraded = report.alert_level != AlertLevel::High
                || report.emotional_state.eq_ignore_ascii_case(NEUTRAL_EMOTIONAL_STATE);

            if critical && downgraded {
                escalate_to_crisis(session);
                for concern in report.concerns {
                    if !session.concerns.contains(&concern) {
                        session.concerns.push(concern);
                    }
                }
            } else {
                session.alert_level = report.alert_level;
                session.concerns = report.concerns;
                session.emotional_state = report.emotional_state;
            }
        }
        AnalysisOutcome::Unparsed(raw) => {
            session.summary = raw;
            let level = classifier::classify(&prompt::transcript(window)).level;
            if critical && level < AlertLevel::High {
                escalate_to_crisis(session);
            } else {
                session.alert_level = level;
            }
        }
    }
}
