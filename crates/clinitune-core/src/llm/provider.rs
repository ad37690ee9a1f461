//! LlmProvider trait definition.

use clinitune_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for generative text backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The Gemini
/// implementation lives in clinitune-infra (`GeminiProvider`).
///
/// Implementations translate transport and API failures into the
/// [`LlmError`] taxonomy and never retry.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send a prompt and receive the generated text.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
