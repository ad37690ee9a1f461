//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait from
//! `clinitune-core` and a factory that builds the configured provider.
//!
//! [`LlmProvider`]: clinitune_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use clinitune_core::llm::box_provider::BoxLlmProvider;
use clinitune_types::config::LlmConfig;
use clinitune_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Build the chat provider, or `None` when no API key is available.
///
/// A missing key is not an error at startup: the service runs and the chat
/// endpoint reports that the assistant is not configured.
pub fn create_provider(
    config: &LlmConfig,
    api_key: Option<SecretString>,
) -> Result<Option<BoxLlmProvider>, LlmError> {
    let Some(api_key) = api_key else {
        tracing::warn!("GEMINI_API_KEY is not set; AI chat is disabled");
        return Ok(None);
    };
    let provider = GeminiProvider::new(api_key, config)?;
    tracing::info!(model = %config.model, "Gemini provider configured");
    Ok(Some(BoxLlmProvider::new(provider)))
}
