//! LLM request/response types for IntelSphere.
//!
//! These types model the data shapes for provider interactions: completion
//! requests, per-provider results, provider configuration, and errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request to an LLM provider for a completion.
///
/// An empty `model` means the provider uses its configured model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Response from an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Errors from LLM provider operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("API key not configured (set {env_var})")]
    MissingApiKey { env_var: String },

    #[error("provider returned no content")]
    EmptyResponse,

    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmError {
    /// Whether this failure points at a missing or rejected API key.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            LlmError::AuthenticationFailed | LlmError::MissingApiKey { .. }
        )
    }
}

/// Backend protocol family of a configured provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Xai,
    Mistral,
    Cohere,
    Voyage,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

impl ProviderKind {
    /// Environment variable holding the API key when the config names none.
    pub fn default_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Xai => "XAI_API_KEY",
            ProviderKind::Mistral => "MISTRAL_API_KEY",
            ProviderKind::Cohere => "COHERE_API_KEY",
            ProviderKind::Voyage => "VOYAGE_API_KEY",
            ProviderKind::OpenAiCompatible => "OPENAI_COMPATIBLE_API_KEY",
        }
    }

    /// Model used when the config leaves `model` empty.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-3.5-turbo-0125",
            ProviderKind::Anthropic => "claude-3-haiku-20240307",
            ProviderKind::Xai => "grok-beta",
            ProviderKind::Mistral => "mistral-large-latest",
            ProviderKind::Cohere => "command-r-plus",
            ProviderKind::Voyage => "voyage-large-2",
            ProviderKind::OpenAiCompatible => "",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::Xai => write!(f, "xai"),
            ProviderKind::Mistral => write!(f, "mistral"),
            ProviderKind::Cohere => write!(f, "cohere"),
            ProviderKind::Voyage => write!(f, "voyage"),
            ProviderKind::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "xai" => Ok(ProviderKind::Xai),
            "mistral" => Ok(ProviderKind::Mistral),
            "cohere" => Ok(ProviderKind::Cohere),
            "voyage" => Ok(ProviderKind::Voyage),
            "openai_compatible" => Ok(ProviderKind::OpenAiCompatible),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}

/// Configuration for a single provider slot in the fan-out roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Label shown in composed output (e.g., "OpenAI-1", "Mistral-Large").
    pub label: String,
    /// Backend protocol for this slot.
    pub kind: ProviderKind,
    /// Model identifier. Empty means [`ProviderKind::default_model`].
    #[serde(default)]
    pub model: String,
    /// Env var holding the API key. `None` means [`ProviderKind::default_env_var`].
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Override the default base URL for the provider.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-slot output limit; falls back to the aggregator default.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl ProviderConfig {
    /// Create a slot with the kind's default model and key env var.
    pub fn new(label: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            label: label.into(),
            kind,
            model: String::new(),
            api_key_env: None,
            base_url: None,
            max_tokens: None,
            temperature: None,
            enabled: true,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The model actually requested for this slot.
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            self.kind.default_model()
        } else {
            &self.model
        }
    }

    /// The env var consulted for this slot's API key.
    pub fn effective_env_var(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.kind.default_env_var())
    }
}

/// Outcome of one provider call within a fan-out.
///
/// Created per request and discarded once the aggregate is composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    /// Provider label.
    pub provider: String,
    pub model: String,
    /// Response text; empty on failure.
    pub response: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

/// Configuration and key presence of one roster slot, as reported by
/// `/api/models/status` and `sphere providers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub label: String,
    pub kind: ProviderKind,
    pub model: String,
    pub api_key_env: String,
    pub key_present: bool,
    pub enabled: bool,
}
