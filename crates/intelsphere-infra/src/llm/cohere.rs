//! Cohere provider (`/v2/chat`).
//!
//! The system prompt is sent as a leading `system` message. Reply text is
//! the concatenation of the `text` content parts.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use intelsphere_core::llm::provider::LlmProvider;
use intelsphere_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::{status_error, transport_error};

pub const DEFAULT_BASE_URL: &str = "https://api.cohere.com";

#[derive(Debug, Serialize)]
struct CohereChatRequest {
    model: String,
    messages: Vec<CohereMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CohereMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CohereChatResponse {
    #[serde(default)]
    id: String,
    message: CohereReply,
    #[serde(default)]
    usage: Option<CohereUsage>,
}

#[derive(Debug, Deserialize)]
struct CohereReply {
    #[serde(default)]
    content: Vec<CohereContent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum CohereContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct CohereUsage {
    #[serde(default)]
    tokens: Option<CohereTokens>,
}

#[derive(Debug, Deserialize)]
struct CohereTokens {
    #[serde(default)]
    input_tokens: f64,
    #[serde(default)]
    output_tokens: f64,
}

/// Cohere chat provider for one roster slot.
pub struct CohereProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    label: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
}

impl CohereProvider {
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
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_defaults(mut self, max_tokens: Option<u32>, temperature: Option<f64>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    fn to_cohere_request(&self, request: &CompletionRequest) -> CohereChatRequest {
        let system = request.system.iter().map(|s| CohereMessage {
            role: "system".to_string(),
            content: s.clone(),
        });
        let messages = system
            .chain(request.messages.iter().map(|m| CohereMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            }))
            .collect();

        CohereChatRequest {
            model: if request.model.is_empty() {
                self.model.clone()
            } else {
                request.model.clone()
            },
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature.or(self.temperature),
        }
    }
}

impl LlmProvider for CohereProvider {
    fn name(&self) -> &str {
        &self.label
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.to_cohere_request(request);

        let response = self
            .client
            .post(format!("{}/v2/chat", self.base_url))
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

        let resp: CohereChatResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let content = resp
            .message
            .content
            .iter()
            .filter_map(|part| match part {
                CohereContent::Text { text } => Some(text.as_str()),
                CohereContent::Other => None,
            })
            .collect();

        // Cohere reports token counts as floats.
        let usage = resp
            .usage
            .and_then(|u| u.tokens)
            .map(|t| Usage {
                input_tokens: t.input_tokens as u32,
                output_tokens: t.output_tokens as u32,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: resp.id,
            content,
            model: body.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use intelsphere_types::llm::Message;

    fn provider(base: &str) -> CohereProvider {
        CohereProvider::new(
            reqwest::Client::new(),
            SecretString::from("co-test"),
            "Cohere-Command-R-Plus",
            "command-r-plus",
        )
        .with_base_url(base)
        .with_defaults(None, Some(0.7))
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("Summarize")],
            system: Some("You are an analyst.".to_string()),
            max_tokens: 1500,
            temperature: None,
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[test]
    fn test_system_prompt_becomes_first_message() {
        let req = provider("http://unused").to_cohere_request(&request());
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.temperature, Some(0.7));
        assert_eq!(req.model, "command-r-plus");
    }

    #[tokio::test]
    async fn test_complete_concatenates_text_parts() {
        let app = Router::new().route(
            "/v2/chat",
            post(|headers: HeaderMap| async move {
                assert_eq!(headers["authorization"], "Bearer co-test");
                axum::Json(serde_json::json!({
                    "id": "c-1",
                    "finish_reason": "COMPLETE",
                    "message": {
                        "role": "assistant",
                        "content": [
                            {"type": "text", "text": "Part one. "},
                            {"type": "text", "text": "Part two."}
                        ]
                    },
                    "usage": {
                        "billed_units": {"input_tokens": 10, "output_tokens": 4},
                        "tokens": {"input_tokens": 70.0, "output_tokens": 4.0}
                    }
                }))
            }),
        );
        let base = serve(app).await;

        let resp = provider(&base).complete(&request()).await.unwrap();
        assert_eq!(resp.content, "Part one. Part two.");
        assert_eq!(resp.model, "command-r-plus");
        assert_eq!(resp.usage.total(), 74);
    }

    #[tokio::test]
    async fn test_rate_limit_status() {
        let app = Router::new().route(
            "/v2/chat",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = serve(app).await;

        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }
}
