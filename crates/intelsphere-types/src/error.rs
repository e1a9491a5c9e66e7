use serde::Serialize;
use thiserror::Error;

/// A provider that did not contribute to an aggregate response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
    /// The failure was a missing or rejected API key.
    pub credential: bool,
}

/// Errors from a multi-provider fan-out.
#[derive(Debug, Clone, Error)]
pub enum AggregateError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no providers are configured; enable at least one provider in sphere.toml")]
    NoProviders,

    #[error(
        "no authentic data: all {attempted} providers failed. Please check API keys for OpenAI, Anthropic, xAI, Mistral, Cohere, or Voyage{}",
        credential_summary(.failures)
    )]
    NoAuthenticData {
        attempted: usize,
        failures: Vec<ProviderFailure>,
    },
}

fn credential_summary(failures: &[ProviderFailure]) -> String {
    let rejected: Vec<String> = failures
        .iter()
        .filter(|f| f.credential)
        .map(|f| format!("{} ({})", f.provider, f.error))
        .collect();
    if rejected.is_empty() {
        String::new()
    } else {
        format!(". Credential problems: {}", rejected.join("; "))
    }
}

/// Errors loading gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}
