//! GeminiProvider: concrete [`LlmProvider`] for Google Gemini.
//!
//! Sends one `generateContent` request per completion, with the API key as
//! the `key` query parameter. There is no retry.
//!
//! The API key is wrapped in [`secrecy::SecretString`]; transport errors are
//! stripped of their URL before they are logged or returned so the key never
//! leaks through error text.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::Span;
use tracing::field::Empty;

use clinitune_core::llm::provider::LlmProvider;
use clinitune_observe::genai_attrs;
use clinitune_types::config::LlmConfig;
use clinitune_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::types::{
    ErrorEnvelope, FINISH_REASON_SAFETY, GenerateContentRequest, GenerateContentResponse,
};

/// Google Gemini LLM provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.trim_start_matches("models/").to_string(),
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Translate a non-2xx response into the error taxonomy.
pub fn classify_http_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .ok();
    let lowered = body.to_lowercase();

    if status == 401 || status == 403 || (status == 400 && lowered.contains("api key")) {
        return LlmError::Unauthorized;
    }
    if status == 429
        || lowered.contains("quota")
        || message
            .as_ref()
            .is_some_and(|m| m.status == "RESOURCE_EXHAUSTED")
        || body.contains("RESOURCE_EXHAUSTED")
    {
        return LlmError::QuotaExceeded;
    }
    LlmError::Provider {
        status,
        message: message
            .map(|m| m.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.to_string()),
    }
}

/// Pull the reply text out of a successful response.
pub fn extract_text(response: &GenerateContentResponse) -> Result<(String, Option<String>), LlmError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        return Err(LlmError::SafetyBlocked(reason));
    }

    let candidate = response.candidates.first().ok_or(LlmError::EmptyResponse)?;
    match candidate.first_text() {
        Some(text) if !text.trim().is_empty() => {
            Ok((text.to_string(), candidate.finish_reason.clone()))
        }
        _ if candidate.finish_reason.as_deref() == Some(FINISH_REASON_SAFETY) => {
            Err(LlmError::SafetyBlocked(FINISH_REASON_SAFETY.to_string()))
        }
        _ => Err(LlmError::EmptyResponse),
    }
}

fn network_error(e: reqwest::Error) -> LlmError {
    LlmError::Network(e.without_url().to_string())
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        genai_attrs::PROVIDER_GEMINI
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(
        name = "gen_ai.complete",
        skip_all,
        fields(
            gen_ai.operation.name = genai_attrs::OP_CHAT,
            gen_ai.provider.name = genai_attrs::PROVIDER_GEMINI,
            gen_ai.request.model = %self.model,
            gen_ai.usage.input_tokens = Empty,
            gen_ai.usage.output_tokens = Empty,
            gen_ai.response.finish_reasons = Empty,
        )
    )]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = GenerateContentRequest::from_prompt(&request.prompt, &request.params);

        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let text = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            let err = classify_http_error(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), error = %err, "Gemini request failed");
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let span = Span::current();
        if let Some(usage) = &parsed.usage_metadata {
            span.record(genai_attrs::GEN_AI_USAGE_INPUT_TOKENS, usage.prompt_token_count);
            span.record(genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS, usage.candidates_token_count);
        }
        if let Some(reason) = parsed.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            span.record(genai_attrs::GEN_AI_RESPONSE_FINISH_REASONS, reason);
        }

        let (text, finish_reason) = extract_text(&parsed)?;
        Ok(CompletionResponse {
            text,
            model: parsed.model_version.unwrap_or_else(|| self.model.clone()),
            finish_reason,
        })
    }
}
