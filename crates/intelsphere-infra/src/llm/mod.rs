//! LLM provider implementations.
//!
//! Concrete [`LlmProvider`](intelsphere_core::llm::provider::LlmProvider)
//! clients for each supported vendor, plus the factory
//! ([`create_provider`], [`build_registry`]) that turns the configured
//! roster into a [`ProviderRegistry`].

pub mod anthropic;
pub mod cohere;
pub mod missing_key;
pub mod openai_compat;
pub mod voyage;

use std::collections::HashSet;
use std::time::Duration;

use secrecy::SecretString;

use intelsphere_core::llm::box_provider::BoxLlmProvider;
use intelsphere_core::llm::registry::ProviderRegistry;
use intelsphere_types::llm::{LlmError, ProviderConfig, ProviderKind, ProviderStatus};

use self::anthropic::AnthropicProvider;
use self::cohere::CohereProvider;
use self::missing_key::MissingKeyProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::voyage::VoyageProvider;
use crate::secret::KeySource;

/// Build the HTTP client shared by every reqwest-based provider.
///
/// `timeout` bounds a single request end to end; the aggregator applies its
/// own per-provider deadline on top.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("intelsphere/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Create a [`BoxLlmProvider`] for one roster slot.
///
/// A slot without a key becomes a [`MissingKeyProvider`] so the gap is
/// reported per request instead of at startup.
///
/// # Errors
///
/// Returns [`LlmError::InvalidRequest`] for an `openai_compatible` slot
/// without a `base_url`.
pub fn create_provider(
    config: &ProviderConfig,
    api_key: Option<SecretString>,
    http: &reqwest::Client,
) -> Result<BoxLlmProvider, LlmError> {
    let label = config.label.as_str();
    let model = config.effective_model();

    if config.kind == ProviderKind::OpenAiCompatible && config.base_url.is_none() {
        return Err(LlmError::InvalidRequest(format!(
            "provider '{label}' is openai_compatible but has no base_url"
        )));
    }

    let Some(key) = api_key else {
        return Ok(BoxLlmProvider::new(MissingKeyProvider::new(
            label,
            model,
            config.effective_env_var(),
        )));
    };

    let provider = match config.kind {
        ProviderKind::Anthropic => {
            let mut provider = AnthropicProvider::new(http.clone(), key, label, model)
                .with_defaults(config.max_tokens, config.temperature);
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            BoxLlmProvider::new(provider)
        }
        ProviderKind::Cohere => {
            let mut provider = CohereProvider::new(http.clone(), key, label, model)
                .with_defaults(config.max_tokens, config.temperature);
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            BoxLlmProvider::new(provider)
        }
        ProviderKind::Voyage => {
            let mut provider = VoyageProvider::new(http.clone(), key, label, model);
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            BoxLlmProvider::new(provider)
        }
        ProviderKind::OpenAi
        | ProviderKind::Xai
        | ProviderKind::Mistral
        | ProviderKind::OpenAiCompatible => {
            let mut oai_config = match (config.kind, config.base_url.as_deref()) {
                (_, Some(base_url)) => openai_compat::config::custom(label, base_url, key, model),
                (ProviderKind::Xai, None) => openai_compat::config::xai_defaults(label, key, model),
                (ProviderKind::Mistral, None) => {
                    openai_compat::config::mistral_defaults(label, key, model)
                }
                _ => openai_compat::config::openai_defaults(label, key, model),
            };
            oai_config.max_tokens = config.max_tokens;
            oai_config.temperature = config.temperature;
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config))
        }
    };
    Ok(provider)
}

/// Build the fan-out registry from the configured roster.
///
/// Disabled slots are skipped. Keys are resolved through `keys`.
///
/// # Errors
///
/// Returns [`LlmError::InvalidRequest`] when two enabled slots share a
/// label, or when [`create_provider`] rejects a slot.
pub fn build_registry(
    configs: &[ProviderConfig],
    keys: &dyn KeySource,
    http: &reqwest::Client,
) -> Result<ProviderRegistry, LlmError> {
    let mut registry = ProviderRegistry::new();
    let mut labels = HashSet::new();
    for config in configs.iter().filter(|c| c.enabled) {
        if !labels.insert(config.label.as_str()) {
            return Err(LlmError::InvalidRequest(format!(
                "provider label '{}' is used by more than one enabled slot",
                config.label
            )));
        }
        let key = keys.get(config.effective_env_var());
        if key.is_none() {
            tracing::warn!(
                provider = %config.label,
                env_var = config.effective_env_var(),
                "API key not set; provider will report a credential failure"
            );
        }
        let provider = create_provider(config, key, http)?;
        tracing::debug!(provider = %provider.name(), model = %provider.model(), "Registered provider");
        registry.register(provider);
    }
    Ok(registry)
}

/// Roster slots with their resolved model and key presence.
pub fn provider_statuses(configs: &[ProviderConfig], keys: &dyn KeySource) -> Vec<ProviderStatus> {
    configs
        .iter()
        .map(|c| ProviderStatus {
            label: c.label.clone(),
            kind: c.kind,
            model: c.effective_model().to_string(),
            api_key_env: c.effective_env_var().to_string(),
            key_present: keys.is_present(c.effective_env_var()),
            enabled: c.enabled,
        })
        .collect()
}

/// Map a non-success HTTP status from a provider API to an [`LlmError`].
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited {
            retry_after_ms: None,
        },
        529 | 503 => LlmError::Overloaded(body),
        400 | 422 => LlmError::InvalidRequest(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

/// Map a reqwest transport failure (connect, TLS, timeout) to an [`LlmError`].
pub(crate) fn transport_error(err: reqwest::Error) -> LlmError {
    LlmError::Provider {
        message: format!("HTTP request failed: {err}"),
    }
}
