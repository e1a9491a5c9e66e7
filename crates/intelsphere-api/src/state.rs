//! Application state shared by the CLI and the HTTP handlers.
//!
//! The aggregator is built once from the loaded configuration and injected
//! here; handlers never construct providers themselves.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use intelsphere_core::aggregate::{Aggregator, AggregatorSettings};
use intelsphere_core::llm::registry::ProviderRegistry;
use intelsphere_infra::llm::{build_http_client, build_registry, provider_statuses};
use intelsphere_infra::secret::KeySource;
use intelsphere_types::config::GlobalConfig;
use intelsphere_types::llm::ProviderStatus;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub config: Arc<GlobalConfig>,
    /// Roster snapshot taken at startup; keys are not re-read per request.
    pub providers: Arc<Vec<ProviderStatus>>,
}

impl AppState {
    /// Wire the provider registry and aggregator from `config`.
    pub fn init(config: GlobalConfig, keys: &dyn KeySource) -> anyhow::Result<Self> {
        // Slightly longer than the aggregator deadline so the aggregator's
        // timeout is the one that fires.
        let http_timeout = Duration::from_secs(config.aggregator.provider_timeout_secs + 5);
        let http = build_http_client(http_timeout).context("failed to build HTTP client")?;

        let registry = build_registry(&config.providers, keys, &http)
            .context("invalid provider configuration")?;
        let providers = provider_statuses(&config.providers, keys);

        tracing::info!(
            providers = registry.len(),
            with_keys = providers.iter().filter(|p| p.enabled && p.key_present).count(),
            "Provider registry ready"
        );

        Ok(Self::from_parts(config, registry, providers))
    }

    pub fn from_parts(
        config: GlobalConfig,
        registry: ProviderRegistry,
        providers: Vec<ProviderStatus>,
    ) -> Self {
        let settings = AggregatorSettings::from(&config.aggregator);
        Self {
            aggregator: Arc::new(Aggregator::new(registry, settings)),
            config: Arc::new(config),
            providers: Arc::new(providers),
        }
    }
}
