//! Placeholder for a roster slot whose API key is not set.
//!
//! The slot still takes part in every fan-out so it is counted and shows up
//! in the failure list with the env var to set. No request leaves the process.

use intelsphere_core::llm::provider::LlmProvider;
use intelsphere_types::llm::{CompletionRequest, CompletionResponse, LlmError};

pub struct MissingKeyProvider {
    label: String,
    model: String,
    env_var: String,
}

impl MissingKeyProvider {
    pub fn new(
        label: impl Into<String>,
        model: impl Into<String>,
        env_var: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            model: model.into(),
            env_var: env_var.into(),
        }
    }
}

impl LlmProvider for MissingKeyProvider {
    fn name(&self) -> &str {
        &self.label
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::MissingApiKey {
            env_var: self.env_var.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelsphere_types::llm::Message;

    #[tokio::test]
    async fn test_always_fails_with_env_var() {
        let provider = MissingKeyProvider::new("XAI-Grok", "grok-beta", "XAI_API_KEY");
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![Message::user("hi")],
            system: None,
            max_tokens: 10,
            temperature: None,
        };
        let err = provider.complete(&request).await.unwrap_err();
        assert!(err.is_credential_error());
        assert_eq!(err.to_string(), "API key not configured (set XAI_API_KEY)");
    }
}
