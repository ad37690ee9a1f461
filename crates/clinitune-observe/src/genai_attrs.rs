//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Span fields are declared with literal names in `#[tracing::instrument]`
//! (the macro needs identifiers); these constants are used when recording
//! values onto a declared field with [`tracing::Span::record`] and as the
//! canonical field values.

/// The name of the operation being performed (e.g. "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g. "gemini").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reason reported by the provider (e.g. "STOP", "SAFETY").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

// --- Operation name values ---

/// Single-turn text generation.
pub const OP_CHAT: &str = "chat";

// --- Provider name values ---

/// Google Gemini provider identifier.
pub const PROVIDER_GEMINI: &str = "gemini";
