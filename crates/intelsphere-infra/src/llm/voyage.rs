//! Voyage AI provider (`/v1/embeddings`).
//!
//! Voyage returns embeddings, not text. The provider embeds the user prompt
//! and reports a one-line description of the vector so the slot can take
//! part in composition like any chat provider.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use intelsphere_core::llm::provider::LlmProvider;
use intelsphere_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole, Usage};

use super::{status_error, transport_error};

pub const DEFAULT_BASE_URL: &str = "https://api.voyageai.com";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: Vec<&'a str>,
    model: &'a str,
    input_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<EmbeddingUsage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    #[serde(default)]
    total_tokens: u32,
}

/// Voyage embeddings provider for one roster slot.
pub struct VoyageProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    label: String,
    model: String,
}

impl VoyageProvider {
    pub fn new(
        client: reqwest::Client,
        api_key: SecretString,
        label: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            label: label.into(),
            model: model.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Text of the last user message, which is what gets embedded.
fn prompt_text(request: &CompletionRequest) -> Option<&str> {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::User)
        .map(|m| m.content.as_str())
}

fn describe_embedding(model: &str, dimensions: usize, tokens: u32) -> String {
    format!(
        "Generated a {dimensions}-dimensional semantic embedding of the query with {model} \
         ({tokens} tokens). Embedding models return vectors, not prose; use this slot for \
         similarity search rather than narrative analysis."
    )
}

impl LlmProvider for VoyageProvider {
    fn name(&self) -> &str {
        &self.label
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let text = prompt_text(request)
            .ok_or_else(|| LlmError::InvalidRequest("no user message to embed".to_string()))?;
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };

        let body = EmbeddingRequest {
            input: vec![text],
            model,
            input_type: "query",
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status, error_body));
        }

        let resp: EmbeddingResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let dimensions = resp.data.first().map(|d| d.embedding.len()).unwrap_or(0);
        if dimensions == 0 {
            return Err(LlmError::EmptyResponse);
        }
        let tokens = resp.usage.map(|u| u.total_tokens).unwrap_or(0);
        let model = if resp.model.is_empty() {
            model.to_string()
        } else {
            resp.model
        };

        Ok(CompletionResponse {
            id: String::new(),
            content: describe_embedding(&model, dimensions, tokens),
            model,
            usage: Usage {
                input_tokens: tokens,
                output_tokens: 0,
            },
        })
    }
}
