//! Gateway configuration types for IntelSphere.
//!
//! `GlobalConfig` represents the `sphere.toml` file controlling the HTTP
//! server, fan-out behavior, and the provider roster. Every field has a
//! default so an empty file (or no file) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::llm::{ProviderConfig, ProviderKind};

/// Top-level configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub aggregator: AggregatorConfig,

    /// Providers queried on every fan-out, in display order.
    #[serde(default = "default_roster")]
    pub providers: Vec<ProviderConfig>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            aggregator: AggregatorConfig::default(),
            providers: default_roster(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS origins; `"*"` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Built dashboard directory served as an SPA, if it exists.
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3005".to_string()]
}

fn default_static_dir() -> Option<String> {
    Some("dist".to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            static_dir: default_static_dir(),
        }
    }
}

/// Fan-out behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Per-provider deadline; a provider exceeding it counts as failed.
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
    /// Output limit for slots without their own `max_tokens`.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Placed between labeled sections in the composed response.
    #[serde(default = "default_section_separator")]
    pub section_separator: String,
}

fn default_provider_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_section_separator() -> String {
    "\n\n---\n\n".to_string()
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_provider_timeout_secs(),
            max_tokens: default_max_tokens(),
            section_separator: default_section_separator(),
        }
    }
}

/// The eight-slot roster used when the config file names no providers.
pub fn default_roster() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new("OpenAI-1", ProviderKind::OpenAi).with_temperature(0.7),
        ProviderConfig::new("OpenAI-2", ProviderKind::OpenAi).with_temperature(0.8),
        ProviderConfig::new("Anthropic-Haiku", ProviderKind::Anthropic)
            .with_model("claude-3-haiku-20240307"),
        ProviderConfig::new("Anthropic-Sonnet", ProviderKind::Anthropic)
            .with_model("claude-3-5-sonnet-20241022"),
        ProviderConfig::new("XAI-Grok", ProviderKind::Xai).with_temperature(0.7),
        ProviderConfig::new("Mistral-Large", ProviderKind::Mistral).with_temperature(0.7),
        ProviderConfig::new("Cohere-Command-R-Plus", ProviderKind::Cohere).with_temperature(0.7),
        ProviderConfig::new("Voyage-Large-2", ProviderKind::Voyage),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.aggregator.provider_timeout_secs, 60);
        assert_eq!(config.aggregator.max_tokens, 1500);
        assert_eq!(config.providers.len(), 8);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:3005"]);
        assert_eq!(config.aggregator.section_separator, "\n\n---\n\n");
        assert_eq!(config.providers.len(), 8);
    }

    #[test]
    fn test_toml_with_custom_roster() {
        let toml_str = r#"
[server]
port = 8080
allowed_origins = ["*"]

[aggregator]
provider_timeout_secs = 15

[[providers]]
label = "Claude"
kind = "anthropic"
model = "claude-sonnet-4-20250514"

[[providers]]
label = "Local"
kind = "openai_compatible"
base_url = "http://localhost:11434/v1"
api_key_env = "LOCAL_KEY"
enabled = false
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.aggregator.provider_timeout_secs, 15);
        assert_eq!(config.aggregator.max_tokens, 1500);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[0].kind, ProviderKind::Anthropic);
        assert!(!config.providers[1].enabled);
        assert_eq!(config.providers[1].effective_env_var(), "LOCAL_KEY");
    }

    #[test]
    fn test_default_roster_labels_are_unique() {
        let roster = default_roster();
        let mut labels: Vec<&str> = roster.iter().map(|p| p.label.as_str()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), roster.len());
    }
}
