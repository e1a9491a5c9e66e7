//! Per-vendor defaults for OpenAI-compatible providers.
//!
//! OpenAI, xAI and Mistral all speak the chat completions protocol; they
//! differ only in base URL. Each factory returns an [`OpenAiCompatConfig`]
//! for [`super::OpenAiCompatibleProvider::new`].

use secrecy::SecretString;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const XAI_BASE_URL: &str = "https://api.x.ai/v1";
pub const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Configuration for an OpenAI-compatible roster slot.
pub struct OpenAiCompatConfig {
    /// Label shown in composed output (e.g., "OpenAI-1").
    pub label: String,
    /// Base URL including the version path (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

impl OpenAiCompatConfig {
    fn with_base(label: &str, base_url: &str, api_key: SecretString, model: &str) -> Self {
        Self {
            label: label.into(),
            base_url: base_url.into(),
            api_key,
            model: model.into(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// OpenAI. Base URL: `https://api.openai.com/v1`.
pub fn openai_defaults(label: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig::with_base(label, OPENAI_BASE_URL, api_key, model)
}

/// xAI Grok. Base URL: `https://api.x.ai/v1`.
pub fn xai_defaults(label: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig::with_base(label, XAI_BASE_URL, api_key, model)
}

/// Mistral AI. Base URL: `https://api.mistral.ai/v1`.
pub fn mistral_defaults(label: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig::with_base(label, MISTRAL_BASE_URL, api_key, model)
}

/// Any other OpenAI-compatible endpoint.
pub fn custom(label: &str, base_url: &str, api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig::with_base(label, base_url.trim_end_matches('/'), api_key, model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("k")
    }

    #[test]
    fn test_vendor_base_urls() {
        assert_eq!(openai_defaults("OpenAI-1", key(), "gpt-4o").base_url, OPENAI_BASE_URL);
        assert_eq!(xai_defaults("XAI-Grok", key(), "grok-beta").base_url, "https://api.x.ai/v1");
        assert_eq!(
            mistral_defaults("Mistral-Large", key(), "mistral-large-latest").base_url,
            "https://api.mistral.ai/v1"
        );
    }

    #[test]
    fn test_custom_trims_trailing_slash() {
        let cfg = custom("Local", "http://localhost:11434/v1/", key(), "llama3");
        assert_eq!(cfg.base_url, "http://localhost:11434/v1");
        assert_eq!(cfg.label, "Local");
    }
}
