//! Provider roster endpoints.
//!
//! GET  /api/models/status     - Configured providers and key presence.
//! POST /api/models/diagnostic - One tiny completion per provider.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use intelsphere_core::aggregate::AggregateOptions;
use intelsphere_types::llm::ProviderStatus;

use crate::http::error::AppError;
use crate::state::AppState;

const DIAGNOSTIC_PROMPT: &str = "Reply with the single word OK.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsStatusResponse {
    pub success: bool,
    pub total_models: usize,
    pub enabled_models: usize,
    /// Enabled slots whose key env var is set.
    pub configured_models: usize,
    pub providers: Vec<ProviderStatus>,
    pub timestamp: i64,
}

/// GET /api/models/status
pub async fn status(State(state): State<AppState>) -> Json<ModelsStatusResponse> {
    let providers = state.providers.as_ref().clone();
    let enabled = providers.iter().filter(|p| p.enabled);

    Json(ModelsStatusResponse {
        success: true,
        total_models: providers.len(),
        enabled_models: enabled.clone().count(),
        configured_models: enabled.filter(|p| p.key_present).count(),
        providers,
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCheck {
    pub provider: String,
    pub model: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResponse {
    pub success: bool,
    pub working: usize,
    pub total: usize,
    pub results: Vec<ProviderCheck>,
    pub timestamp: i64,
}

/// POST /api/models/diagnostic
///
/// Reports every provider, working or not; only an empty roster is an error.
pub async fn diagnostic(State(state): State<AppState>) -> Result<Json<DiagnosticResponse>, AppError> {
    let options = AggregateOptions {
        max_tokens: Some(10),
        temperature: Some(0.0),
        ..AggregateOptions::default()
    };
    let settled = state
        .aggregator
        .settle(DIAGNOSTIC_PROMPT, &options)
        .await
        .map_err(|e| AppError::aggregate("Failed to run provider diagnostic", e))?;

    let results: Vec<ProviderCheck> = settled
        .into_iter()
        .map(|s| ProviderCheck {
            ok: s.response.success,
            provider: s.response.provider,
            model: s.response.model,
            error: s.response.error,
            latency_ms: s.response.latency_ms,
        })
        .collect();
    let working = results.iter().filter(|r| r.ok).count();
    tracing::info!(working, total = results.len(), "Provider diagnostic complete");

    Ok(Json(DiagnosticResponse {
        success: true,
        working,
        total: results.len(),
        results,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}
