//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement.

use intelsphere_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Anthropic, OpenAI, Cohere, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Wrap in
/// [`super::box_provider::BoxLlmProvider`] for dynamic dispatch.
///
/// Implementations live in intelsphere-infra (e.g., `AnthropicProvider`).
pub trait LlmProvider: Send + Sync {
    /// Roster label for this provider (e.g., "OpenAI-1", "Mistral-Large").
    fn name(&self) -> &str;

    /// Model identifier requested when the request leaves `model` empty.
    fn model(&self) -> &str;

    /// Output limit configured for this slot. The aggregator uses it when
    /// the caller sets no limit of its own.
    fn max_tokens(&self) -> Option<u32> {
        None
    }

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
