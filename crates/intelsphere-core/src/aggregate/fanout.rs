//! Concurrent fan-out of one request to every registered provider.
//!
//! Each provider runs in its own task on a `JoinSet` under a per-provider
//! deadline. Results are collected as tasks settle, so the returned order
//! is arrival order, not roster order. A failing, timed-out, or panicking
//! provider becomes an unsuccessful [`ModelResponse`]; nothing is retried.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{self, JoinSet};
use tokio::time::Instant;
use tracing::Instrument;

use intelsphere_types::error::ProviderFailure;
use intelsphere_types::llm::{CompletionRequest, LlmError, ModelResponse};

use crate::llm::box_provider::BoxLlmProvider;

/// One provider's settled result.
#[derive(Debug, Clone)]
pub struct Settled {
    pub response: ModelResponse,
    /// The typed error behind an unsuccessful response.
    pub error: Option<LlmError>,
}

impl Settled {
    pub fn is_success(&self) -> bool {
        self.response.success
    }

    /// Failure summary for error reporting; `None` for successes.
    pub fn failure(&self) -> Option<ProviderFailure> {
        if self.response.success {
            return None;
        }
        Some(ProviderFailure {
            provider: self.response.provider.clone(),
            error: self.response.error.clone().unwrap_or_default(),
            credential: self
                .error
                .as_ref()
                .is_some_and(LlmError::is_credential_error),
        })
    }
}

/// Send one request to every provider concurrently and wait for every one to settle.
///
/// `request_for` builds each provider's request, so per-slot limits can be
/// resolved before the call.
pub async fn fan_out<F>(
    providers: &[Arc<BoxLlmProvider>],
    request_for: F,
    provider_timeout: Duration,
) -> Vec<Settled>
where
    F: Fn(&BoxLlmProvider) -> CompletionRequest,
{
    let started = Instant::now();
    let mut set: JoinSet<Settled> = JoinSet::new();
    // Task id -> (label, model), so a panicked task can still be named.
    let mut spawned: HashMap<task::Id, (String, String)> = HashMap::with_capacity(providers.len());

    for provider in providers {
        let request = request_for(provider.as_ref());
        let provider = Arc::clone(provider);
        let identity = (provider.name().to_string(), provider.model().to_string());

        let handle =
            set.spawn(async move { call_provider(&provider, &request, provider_timeout).await });
        spawned.insert(handle.id(), identity);
    }

    let mut settled = Vec::with_capacity(providers.len());
    while let Some(joined) = set.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                spawned.remove(&id);
                settled.push(outcome);
            }
            Err(join_err) => {
                let Some((provider, model)) = spawned.remove(&join_err.id()) else {
                    tracing::error!(error = %join_err, "Unknown provider task aborted");
                    continue;
                };
                tracing::error!(%provider, error = %join_err, "Provider task aborted");
                let err = LlmError::Provider {
                    message: "provider task aborted".to_string(),
                };
                let latency_ms = started.elapsed().as_millis() as u64;
                settled.push(failed(provider, model, err, latency_ms));
            }
        }
    }
    settled
}

async fn call_provider(
    provider: &BoxLlmProvider,
    request: &CompletionRequest,
    provider_timeout: Duration,
) -> Settled {
    let start = Instant::now();
    let span = tracing::info_span!(
        "gen_ai.complete",
        gen_ai.system = provider.name(),
        gen_ai.request.model = provider.model(),
        gen_ai.request.max_tokens = request.max_tokens,
        gen_ai.request.temperature = ?request.temperature,
    );

    let outcome = tokio::time::timeout(provider_timeout, provider.complete(request))
        .instrument(span)
        .await
        .unwrap_or_else(|_| {
            Err(LlmError::Timeout {
                after_ms: provider_timeout.as_millis() as u64,
            })
        })
        .and_then(|resp| {
            if resp.content.trim().is_empty() {
                Err(LlmError::EmptyResponse)
            } else {
                Ok(resp)
            }
        });

    let latency_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(resp) => {
            tracing::debug!(provider = %provider.name(), latency_ms, "Provider responded");
            let model = if resp.model.is_empty() {
                provider.model().to_string()
            } else {
                resp.model
            };
            Settled {
                response: ModelResponse {
                    provider: provider.name().to_string(),
                    model,
                    response: resp.content,
                    success: true,
                    tokens: Some(resp.usage.total()).filter(|t| *t > 0),
                    error: None,
                    latency_ms,
                },
                error: None,
            }
        }
        Err(err) => {
            tracing::warn!(provider = %provider.name(), error = %err, latency_ms, "Provider failed");
            failed(
                provider.name().to_string(),
                provider.model().to_string(),
                err,
                latency_ms,
            )
        }
    }
}

fn failed(provider: String, model: String, err: LlmError, latency_ms: u64) -> Settled {
    Settled {
        response: ModelResponse {
            provider,
            model,
            response: String::new(),
            success: false,
            tokens: None,
            error: Some(err.to_string()),
            latency_ms,
        },
        error: Some(err),
    }
}
