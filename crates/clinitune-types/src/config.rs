//! Service configuration types for CliniTune.
//!
//! `AppConfig` represents `config.toml` in the data directory. Every section
//! and field has a default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use crate::llm::GenerationParams;

/// Top-level configuration for the CliniTune service.
///
/// Loaded from `~/.clinitune/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub triage: TriageConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Raise zero or out-of-range values to their minimums.
    pub fn clamped(mut self) -> Self {
        self.llm.max_output_tokens = self.llm.max_output_tokens.max(1);
        self.llm.temperature = self.llm.temperature.clamp(0.0, 2.0);
        self.llm.top_p = self.llm.top_p.clamp(0.0, 1.0);
        self.llm.top_k = self.llm.top_k.max(1);
        self.llm.timeout_secs = self.llm.timeout_secs.max(1);
        self.triage.analysis_interval = self.triage.analysis_interval.max(1);
        self.triage.analysis_window = self.triage.analysis_window.max(1);
        self.auth.session_ttl_hours = self.auth.session_ttl_hours.max(1);
        self
    }
}

/// Generative language API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            model: "gemini-2.0-flash-exp".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_output_tokens: params.max_output_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            timeout_secs: 30,
        }
    }
}

/// Cadence and context sizes for chat risk triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Structured analysis runs when the message count is a multiple of this.
    pub analysis_interval: u32,
    /// Messages before the new one included in the reply prompt.
    pub reply_context_messages: usize,
    /// Trailing messages fed to structured analysis.
    pub analysis_window: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            analysis_interval: 3,
            reply_context_messages: 2,
            analysis_window: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: 24 * 7,
        }
    }
}
