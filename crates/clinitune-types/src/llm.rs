//! LLM request/response types for CliniTune.
//!
//! The assistant talks to a single-turn text generation API: one prompt in,
//! one block of text out. These types model that exchange and its failures.

use serde::{Deserialize, Serialize};

/// Decoding parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 200,
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub params: GenerationParams,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            params,
        }
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub text: String,
    pub model: String,
    /// Provider-reported finish reason, when present (e.g. "STOP").
    pub finish_reason: Option<String>,
}

/// Errors from LLM provider operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LlmError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("AI service authentication failed")]
    Unauthorized,

    #[error("AI service quota exceeded")]
    QuotaExceeded,

    #[error("message blocked by safety filters: {0}")]
    SafetyBlocked(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("no response text received from AI service")]
    EmptyResponse,

    #[error("provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_params_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.max_output_tokens, 200);
        assert!((params.temperature - 0.7).abs() < f64::EPSILON);
        assert!((params.top_p - 0.8).abs() < f64::EPSILON);
        assert_eq!(params.top_k, 40);
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Provider {
            status: 500,
            message: "backend exploded".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("backend exploded"));
    }
}
