//! Multi-provider aggregation.
//!
//! `Aggregator` sends one prompt to every provider in its registry at the
//! same time, keeps the responses that succeed, and composes them into one
//! labeled document. At least one success is required; otherwise the
//! caller gets [`AggregateError::NoAuthenticData`] with every failure.

pub mod compose;
pub mod fanout;

use std::time::Duration;

use serde::Serialize;

use intelsphere_types::config::AggregatorConfig;
use intelsphere_types::error::{AggregateError, ProviderFailure};
use intelsphere_types::llm::{CompletionRequest, Message, ModelResponse};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::registry::ProviderRegistry;

use self::compose::compose_report_body;
use self::fanout::{Settled, fan_out};

/// Tunables resolved from [`AggregatorConfig`].
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub provider_timeout: Duration,
    pub max_tokens: u32,
    pub section_separator: String,
}

impl From<&AggregatorConfig> for AggregatorSettings {
    fn from(config: &AggregatorConfig) -> Self {
        Self {
            provider_timeout: Duration::from_secs(config.provider_timeout_secs),
            max_tokens: config.max_tokens,
            section_separator: config.section_separator.clone(),
        }
    }
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self::from(&AggregatorConfig::default())
    }
}

/// Per-call options layered over the settings.
#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    pub system: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl AggregateOptions {
    pub fn with_system(system: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            ..Self::default()
        }
    }
}

/// Result of a fan-out with at least one successful provider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub query_id: String,
    /// Summary line plus one labeled section per successful provider.
    pub response: String,
    /// Providers the prompt was sent to.
    pub models_processed: usize,
    pub successful_models: usize,
    /// Labels of successful providers, in settlement order.
    pub working_models: Vec<String>,
    /// Successful responses, in settlement order.
    pub responses: Vec<ModelResponse>,
    pub failures: Vec<ProviderFailure>,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Fan-out/fan-in over an injected provider registry.
#[derive(Debug)]
pub struct Aggregator {
    registry: ProviderRegistry,
    settings: AggregatorSettings,
}

impl Aggregator {
    pub fn new(registry: ProviderRegistry, settings: AggregatorSettings) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Build one provider's request.
    ///
    /// The output limit is the caller's, else the slot's, else the
    /// aggregator-wide default.
    fn build_request(
        &self,
        provider: &BoxLlmProvider,
        prompt: &str,
        options: &AggregateOptions,
    ) -> CompletionRequest {
        CompletionRequest {
            model: String::new(),
            messages: vec![Message::user(prompt)],
            system: options.system.clone(),
            max_tokens: options
                .max_tokens
                .or(provider.max_tokens())
                .unwrap_or(self.settings.max_tokens),
            temperature: options.temperature,
        }
    }

    /// Fan out `prompt` and return every provider's settled result.
    ///
    /// Does not require any success; callers that need one use [`Self::run`].
    pub async fn settle(
        &self,
        prompt: &str,
        options: &AggregateOptions,
    ) -> Result<Vec<Settled>, AggregateError> {
        if prompt.trim().is_empty() {
            return Err(AggregateError::InvalidInput("prompt is empty".to_string()));
        }
        if self.registry.is_empty() {
            return Err(AggregateError::NoProviders);
        }

        tracing::info!(
            providers = self.registry.len(),
            prompt_chars = prompt.len(),
            "Fanning out prompt"
        );
        Ok(fan_out(
            self.registry.providers(),
            |provider| self.build_request(provider, prompt, options),
            self.settings.provider_timeout,
        )
        .await)
    }

    /// Fan out `prompt`, keep the successes, and compose them.
    pub async fn run(
        &self,
        prompt: &str,
        options: &AggregateOptions,
    ) -> Result<AggregateReport, AggregateError> {
        let settled = self.settle(prompt, options).await?;
        let attempted = settled.len();

        let failures: Vec<ProviderFailure> = settled.iter().filter_map(Settled::failure).collect();
        let responses: Vec<ModelResponse> = settled
            .into_iter()
            .filter(Settled::is_success)
            .map(|s| s.response)
            .collect();

        if responses.is_empty() {
            tracing::error!(attempted, "No provider returned a usable response");
            return Err(AggregateError::NoAuthenticData {
                attempted,
                failures,
            });
        }

        let query_id = uuid::Uuid::now_v7().simple().to_string();
        let working_models: Vec<String> = responses.iter().map(|r| r.provider.clone()).collect();
        tracing::info!(
            %query_id,
            successful = responses.len(),
            attempted,
            working = %working_models.join(", "),
            "Fan-out complete"
        );

        Ok(AggregateReport {
            response: compose_report_body(
                &query_id,
                &responses,
                attempted,
                &self.settings.section_separator,
            ),
            query_id,
            models_processed: attempted,
            successful_models: responses.len(),
            working_models,
            responses,
            failures,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::LlmProvider;
    use intelsphere_types::llm::{CompletionResponse, LlmError, Usage};

    // --- Mock providers ---

    struct MockProvider {
        name: String,
        delay: Duration,
        result: Result<String, LlmError>,
        echo_system: bool,
        slot_max_tokens: Option<u32>,
    }

    impl MockProvider {
        fn ok(name: &str, delay_ms: u64, text: &str) -> Self {
            Self {
                name: name.to_string(),
                delay: Duration::from_millis(delay_ms),
                result: Ok(text.to_string()),
                echo_system: false,
                slot_max_tokens: None,
            }
        }

        fn failing(name: &str, delay_ms: u64, err: LlmError) -> Self {
            Self {
                name: name.to_string(),
                delay: Duration::from_millis(delay_ms),
                result: Err(err),
                echo_system: false,
                slot_max_tokens: None,
            }
        }

        fn echo(name: &str) -> Self {
            Self {
                echo_system: true,
                ..Self::ok(name, 0, "")
            }
        }

        fn with_slot_limit(mut self, max_tokens: u32) -> Self {
            self.slot_max_tokens = Some(max_tokens);
            self
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        fn max_tokens(&self) -> Option<u32> {
            self.slot_max_tokens
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            tokio::time::sleep(self.delay).await;
            let content = if self.echo_system {
                format!(
                    "system={} max_tokens={}",
                    request.system.clone().unwrap_or_default(),
                    request.max_tokens
                )
            } else {
                self.result.clone()?
            };
            Ok(CompletionResponse {
                id: format!("resp-{}", self.name),
                content,
                model: String::new(),
                usage: Usage {
                    input_tokens: 5,
                    output_tokens: 7,
                },
            })
        }
    }

    struct PanickingProvider;

    impl LlmProvider for PanickingProvider {
        fn name(&self) -> &str {
            "Panics"
        }

        fn model(&self) -> &str {
            "panic-model"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            panic!("provider blew up");
        }
    }

    fn aggregator(providers: Vec<BoxLlmProvider>) -> Aggregator {
        let mut registry = ProviderRegistry::new();
        for p in providers {
            registry.register(p);
        }
        Aggregator::new(
            registry,
            AggregatorSettings {
                provider_timeout: Duration::from_secs(5),
                max_tokens: 1500,
                section_separator: "\n\n---\n\n".to_string(),
            },
        )
    }

    fn missing_key(env: &str) -> LlmError {
        LlmError::MissingApiKey {
            env_var: env.to_string(),
        }
    }

    // --- Tests ---

    #[tokio::test(start_paused = true)]
    async fn test_sections_follow_settlement_order() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(MockProvider::ok("Slow", 30, "slow answer")),
            BoxLlmProvider::new(MockProvider::ok("Fast", 10, "fast answer")),
            BoxLlmProvider::new(MockProvider::ok("Medium", 20, "medium answer")),
        ]);

        let report = agg.run("assess the market", &AggregateOptions::default()).await.unwrap();

        assert_eq!(report.working_models, vec!["Fast", "Medium", "Slow"]);
        assert_eq!(report.models_processed, 3);
        assert_eq!(report.successful_models, 3);
        let fast = report.response.find("**Fast:**").unwrap();
        let medium = report.response.find("**Medium:**").unwrap();
        let slow = report.response.find("**Slow:**").unwrap();
        assert!(fast < medium && medium < slow);
        assert_eq!(report.responses[0].tokens, Some(12));
        assert_eq!(report.responses[0].model, "mock-model");
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_yields_exactly_k_sections() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(MockProvider::ok("A", 5, "alpha")),
            BoxLlmProvider::new(MockProvider::failing("B", 1, LlmError::AuthenticationFailed)),
            BoxLlmProvider::new(MockProvider::ok("C", 10, "gamma")),
            BoxLlmProvider::new(MockProvider::failing("D", 2, LlmError::Provider {
                message: "HTTP 500".to_string(),
            })),
        ]);

        let report = agg.run("q", &AggregateOptions::default()).await.unwrap();

        assert_eq!(report.successful_models, 2);
        assert_eq!(report.models_processed, 4);
        assert_eq!(report.response.matches(":**\n").count(), 2);
        assert!(!report.response.contains("**B:**"));
        assert_eq!(report.failures.len(), 2);
        let b = report.failures.iter().find(|f| f.provider == "B").unwrap();
        assert!(b.credential);
        let d = report.failures.iter().find(|f| f.provider == "D").unwrap();
        assert!(!d.credential);
        assert!(d.error.contains("HTTP 500"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failures_report_no_authentic_data() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(MockProvider::failing("OpenAI-1", 1, missing_key("OPENAI_API_KEY"))),
            BoxLlmProvider::new(MockProvider::failing("Cohere", 2, missing_key("COHERE_API_KEY"))),
            BoxLlmProvider::new(MockProvider::failing("Mistral", 3, LlmError::Overloaded(
                "busy".to_string(),
            ))),
        ]);

        let err = agg.run("q", &AggregateOptions::default()).await.unwrap_err();
        match &err {
            AggregateError::NoAuthenticData { attempted, failures } => {
                assert_eq!(*attempted, 3);
                assert_eq!(failures.len(), 3);
                assert_eq!(failures.iter().filter(|f| f.credential).count(), 2);
            }
            other => panic!("expected NoAuthenticData, got {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("API keys"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(MockProvider::ok("Quick", 10, "done")),
            BoxLlmProvider::new(MockProvider::ok("Stuck", 120_000, "never")),
        ]);

        let report = agg.run("q", &AggregateOptions::default()).await.unwrap();

        assert_eq!(report.working_models, vec!["Quick"]);
        let stuck = &report.failures[0];
        assert_eq!(stuck.provider, "Stuck");
        assert_eq!(stuck.error, "timed out after 5000ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_content_counts_as_failure() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(MockProvider::ok("Blank", 1, "   \n")),
            BoxLlmProvider::new(MockProvider::ok("Real", 2, "content")),
        ]);

        let report = agg.run("q", &AggregateOptions::default()).await.unwrap();
        assert_eq!(report.working_models, vec!["Real"]);
        assert_eq!(report.failures[0].error, "provider returned no content");
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let agg = aggregator(vec![BoxLlmProvider::new(MockProvider::ok("A", 0, "x"))]);
        let err = agg.run("   ", &AggregateOptions::default()).await.unwrap_err();
        assert!(matches!(err, AggregateError::InvalidInput(_)));
        assert_eq!(err.to_string(), "invalid input: prompt is empty");
    }

    #[tokio::test]
    async fn test_empty_registry_rejected() {
        let agg = aggregator(vec![]);
        let err = agg.run("hello", &AggregateOptions::default()).await.unwrap_err();
        assert!(matches!(err, AggregateError::NoProviders));
    }

    #[tokio::test]
    async fn test_options_reach_provider() {
        let agg = aggregator(vec![BoxLlmProvider::new(MockProvider::echo("Echo"))]);
        let options = AggregateOptions {
            system: Some("You are an OSINT analyst.".to_string()),
            temperature: None,
            max_tokens: Some(64),
        };

        let report = agg.run("q", &options).await.unwrap();
        assert_eq!(
            report.responses[0].response,
            "system=You are an OSINT analyst. max_tokens=64"
        );

        let default_report = agg.run("q", &AggregateOptions::default()).await.unwrap();
        assert_eq!(default_report.responses[0].response, "system= max_tokens=1500");
    }

    #[tokio::test]
    async fn test_explicit_limit_beats_slot_limit() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(MockProvider::echo("Capped").with_slot_limit(4000)),
            BoxLlmProvider::new(MockProvider::echo("Plain")),
        ]);
        let reply = |report: &AggregateReport, name: &str| {
            report
                .responses
                .iter()
                .find(|r| r.provider == name)
                .unwrap()
                .response
                .clone()
        };

        let explicit = AggregateOptions {
            max_tokens: Some(10),
            ..AggregateOptions::default()
        };
        let report = agg.run("q", &explicit).await.unwrap();
        assert_eq!(reply(&report, "Capped"), "system= max_tokens=10");
        assert_eq!(reply(&report, "Plain"), "system= max_tokens=10");

        let report = agg.run("q", &AggregateOptions::default()).await.unwrap();
        assert_eq!(reply(&report, "Capped"), "system= max_tokens=4000");
        assert_eq!(reply(&report, "Plain"), "system= max_tokens=1500");
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_mocks_compose_identically() {
        let build = || {
            aggregator(vec![
                BoxLlmProvider::new(MockProvider::ok("A", 10, "first")),
                BoxLlmProvider::new(MockProvider::ok("B", 20, "second")),
            ])
        };

        let one = build().run("q", &AggregateOptions::default()).await.unwrap();
        let two = build().run("q", &AggregateOptions::default()).await.unwrap();

        let strip = |r: &AggregateReport| r.response.replace(&r.query_id, "");
        assert_eq!(strip(&one), strip(&two));
    }

    #[tokio::test]
    async fn test_panicking_provider_is_recorded_as_failure() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(PanickingProvider),
            BoxLlmProvider::new(MockProvider::ok("Steady", 0, "fine")),
        ]);

        let settled = agg.settle("q", &AggregateOptions::default()).await.unwrap();
        assert_eq!(settled.len(), 2);
        let panicked = settled
            .iter()
            .find(|s| s.response.provider == "Panics")
            .unwrap();
        assert!(!panicked.is_success());
        assert_eq!(panicked.response.model, "panic-model");
        assert!(settled.iter().any(|s| s.is_success()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicked_provider_keeps_its_settlement_slot() {
        let agg = aggregator(vec![
            BoxLlmProvider::new(MockProvider::ok("Late", 50, "late")),
            BoxLlmProvider::new(PanickingProvider),
            BoxLlmProvider::new(MockProvider::ok("Later", 80, "later")),
        ]);

        let settled = agg.settle("q", &AggregateOptions::default()).await.unwrap();
        let order: Vec<&str> = settled.iter().map(|s| s.response.provider.as_str()).collect();
        assert_eq!(order, vec!["Panics", "Late", "Later"]);
        assert_eq!(
            settled[0].response.error.as_deref(),
            Some("provider error: provider task aborted")
        );
    }

    #[test]
    fn test_settings_from_config() {
        let config = AggregatorConfig {
            provider_timeout_secs: 12,
            max_tokens: 900,
            section_separator: "\n".to_string(),
        };
        let settings = AggregatorSettings::from(&config);
        assert_eq!(settings.provider_timeout, Duration::from_secs(12));
        assert_eq!(settings.max_tokens, 900);
    }
}
