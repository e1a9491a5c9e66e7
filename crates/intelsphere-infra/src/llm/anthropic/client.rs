//! AnthropicProvider -- concrete [`LlmProvider`] for Anthropic Claude.
//!
//! Sends requests to the Anthropic Messages API (`/v1/messages`). The API
//! key is wrapped in [`SecretString`] and only exposed when building the
//! request headers.

use secrecy::{ExposeSecret, SecretString};

use intelsphere_core::llm::provider::LlmProvider;
use intelsphere_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::types::{AnthropicMessage, AnthropicRequest, AnthropicResponse};
use crate::llm::{status_error, transport_error};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic Claude provider for one roster slot.
///
/// Does not derive `Debug`; the client and key stay out of log output.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    label: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
}

impl AnthropicProvider {
    /// The Anthropic API version header value.
    const API_VERSION: &'static str = "2023-06-01";

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

    /// Override the base URL (proxies and tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Slot defaults. The temperature applies when the request sets none;
    /// the output limit is reported through [`LlmProvider::max_tokens`] and
    /// resolved by the aggregator.
    pub fn with_defaults(mut self, max_tokens: Option<u32>, temperature: Option<f64>) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`CompletionRequest`] into an [`AnthropicRequest`].
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        AnthropicRequest {
            model,
            max_tokens: request.max_tokens,
            messages,
            system: request.system.clone(),
            temperature: request.temperature.or(self.temperature),
        }
    }
}

impl LlmProvider for AnthropicProvider {
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
        let body = self.to_anthropic_request(request);

        let response = self
            .client
            .post(self.url("/v1/messages"))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status, error_body));
        }

        let resp: AnthropicResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        Ok(CompletionResponse {
            content: resp.text(),
            id: resp.id,
            model: resp.model,
            usage: Usage {
                input_tokens: resp.usage.input_tokens,
                output_tokens: resp.usage.output_tokens,
            },
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

    fn make_provider(base_url: &str) -> AnthropicProvider {
        AnthropicProvider::new(
            reqwest::Client::new(),
            SecretString::from("test-key-not-real"),
            "Anthropic-Haiku",
            "claude-3-haiku-20240307",
        )
        .with_base_url(base_url)
    }

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user(text)],
            system: Some("Be brief".to_string()),
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
    fn test_to_anthropic_request_uses_slot_defaults() {
        let provider = make_provider("http://unused").with_defaults(Some(256), Some(0.3));
        assert_eq!(provider.max_tokens(), Some(256));
        let req = provider.to_anthropic_request(&request("Hello"));
        assert_eq!(req.model, "claude-3-haiku-20240307");
        assert_eq!(req.temperature, Some(0.3));
        assert_eq!(req.system.as_deref(), Some("Be brief"));
        assert_eq!(req.messages[0].role, "user");
    }

    #[test]
    fn test_request_limit_is_sent_as_given() {
        let provider = make_provider("http://unused").with_defaults(Some(4000), None);
        let mut explicit = request("Hello");
        explicit.max_tokens = 10;
        assert_eq!(provider.to_anthropic_request(&explicit).max_tokens, 10);
    }

    #[test]
    fn test_base_url_override() {
        let provider = make_provider("http://localhost:8080/");
        assert_eq!(provider.url("/v1/messages"), "http://localhost:8080/v1/messages");
    }

    #[tokio::test]
    async fn test_complete_against_fake_server() {
        let app = Router::new().route(
            "/v1/messages",
            post(|headers: HeaderMap, body: axum::Json<serde_json::Value>| async move {
                assert_eq!(headers["x-api-key"], "test-key-not-real");
                assert_eq!(headers["anthropic-version"], "2023-06-01");
                assert_eq!(body["system"], "Be brief");
                axum::Json(serde_json::json!({
                    "id": "msg_1",
                    "model": "claude-3-haiku-20240307",
                    "content": [{"type": "text", "text": "Hi there"}],
                    "usage": {"input_tokens": 3, "output_tokens": 2}
                }))
            }),
        );
        let base = serve(app).await;

        let resp = make_provider(&base).complete(&request("Hello")).await.unwrap();
        assert_eq!(resp.content, "Hi there");
        assert_eq!(resp.usage.total(), 5);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_failed() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid x-api-key") }),
        );
        let base = serve(app).await;

        let err = make_provider(&base).complete(&request("Hello")).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_overloaded_status() {
        let app = Router::new().route(
            "/v1/messages",
            post(|| async { (StatusCode::from_u16(529).unwrap(), "overloaded") }),
        );
        let base = serve(app).await;

        let err = make_provider(&base).complete(&request("Hello")).await.unwrap_err();
        assert!(matches!(err, LlmError::Overloaded(_)));
    }
}
