//! Chat endpoints.
//!
//! POST /api/chat             - Multi-provider answer in a personality.
//! POST /api/revolutionary-ai - Alias of `/api/chat` kept for the dashboard.
//! POST /api/enhanced-chat    - Chat with panel toggles and per-provider output.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use intelsphere_core::aggregate::{AggregateOptions, AggregateReport};
use intelsphere_core::prompt::Personality;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub model: &'static str,
    pub personality: String,
    pub query_id: String,
    pub models_processed: usize,
    pub working_models: Vec<String>,
    pub successful_models: usize,
    pub total_models: usize,
    pub timestamp: i64,
}

impl ChatResponse {
    fn from_report(report: AggregateReport, personality: Personality) -> Self {
        Self {
            success: true,
            response: report.response,
            model: "multi-model",
            personality: personality.to_string(),
            query_id: report.query_id,
            models_processed: report.models_processed,
            working_models: report.working_models,
            successful_models: report.successful_models,
            total_models: report.models_processed,
            timestamp: report.timestamp,
        }
    }
}

/// Extract a required, non-blank string field.
pub(crate) fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload?;
    let message = required(req.message, "Message is required")?;
    let personality = Personality::from_name(req.personality.as_deref().unwrap_or_default());

    let report = state
        .aggregator
        .run(
            &message,
            &AggregateOptions::with_system(personality.system_prompt()),
        )
        .await
        .map_err(|e| AppError::aggregate("Failed to process chat request", e))?;

    Ok(Json(ChatResponse::from_report(report, personality)))
}

/// POST /api/revolutionary-ai
pub async fn revolutionary_ai(
    state: State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    chat(state, payload).await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub multi_model_mode: bool,
    #[serde(default)]
    pub osint_enabled: bool,
    #[serde(default)]
    pub web_search_enabled: bool,
}

impl EnhancedChatRequest {
    /// Web search wins over OSINT when both toggles are on.
    fn personality(&self) -> Personality {
        if self.web_search_enabled {
            Personality::ResearchAnalyst
        } else if self.osint_enabled {
            Personality::OsintAnalyst
        } else {
            Personality::Strategic
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAnswer {
    pub model: String,
    pub provider: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiModelResponse {
    pub success: bool,
    pub responses: Vec<ProviderAnswer>,
    pub query_id: String,
    pub models_processed: usize,
    pub working_models: Vec<String>,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum EnhancedChatResponse {
    Single(ChatResponse),
    Multi(MultiModelResponse),
}

/// POST /api/enhanced-chat
///
/// In multi-model mode each successful provider's own text is returned
/// separately instead of the composed document.
pub async fn enhanced_chat(
    State(state): State<AppState>,
    payload: Result<Json<EnhancedChatRequest>, JsonRejection>,
) -> Result<Json<EnhancedChatResponse>, AppError> {
    let Json(req) = payload?;
    let personality = req.personality();
    let multi = req.multi_model_mode;
    let message = required(req.message, "Message is required")?;

    let report = state
        .aggregator
        .run(
            &message,
            &AggregateOptions::with_system(personality.system_prompt()),
        )
        .await
        .map_err(|e| AppError::aggregate("Failed to process enhanced chat request", e))?;

    if !multi {
        return Ok(Json(EnhancedChatResponse::Single(ChatResponse::from_report(
            report,
            personality,
        ))));
    }

    let responses = report
        .responses
        .into_iter()
        .map(|r| ProviderAnswer {
            model: r.model,
            provider: r.provider,
            content: r.response,
        })
        .collect();

    Ok(Json(EnhancedChatResponse::Multi(MultiModelResponse {
        success: true,
        responses,
        query_id: report.query_id,
        models_processed: report.models_processed,
        working_models: report.working_models,
        timestamp: report.timestamp,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required(None, "Message is required").is_err());
        assert!(required(Some("  ".into()), "Message is required").is_err());
        assert_eq!(required(Some("hi".into()), "x").unwrap(), "hi");
    }

    #[test]
    fn test_enhanced_personality_selection() {
        let mut req = EnhancedChatRequest {
            message: None,
            multi_model_mode: false,
            osint_enabled: true,
            web_search_enabled: false,
        };
        assert_eq!(req.personality(), Personality::OsintAnalyst);
        req.web_search_enabled = true;
        assert_eq!(req.personality(), Personality::ResearchAnalyst);
        req.osint_enabled = false;
        req.web_search_enabled = false;
        assert_eq!(req.personality(), Personality::Strategic);
    }
}
