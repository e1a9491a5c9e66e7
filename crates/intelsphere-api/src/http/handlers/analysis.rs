//! Dashboard analysis panels.
//!
//! Each panel builds a templated prompt from its form fields, runs it through
//! the aggregator in the matching analyst personality, and returns the
//! composed document along with the providers that contributed.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use intelsphere_core::aggregate::{AggregateOptions, AggregateReport};
use intelsphere_core::prompt::{self, Personality};

use super::chat::required;
use crate::http::error::AppError;
use crate::state::AppState;

async fn run_panel(
    state: &AppState,
    prompt: &str,
    personality: Personality,
    context: &'static str,
) -> Result<AggregateReport, AppError> {
    state
        .aggregator
        .run(prompt, &AggregateOptions::with_system(personality.system_prompt()))
        .await
        .map_err(|e| AppError::aggregate(context, e))
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

// --- Intelligence analysis ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceRequest {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntelligenceResponse {
    pub success: bool,
    pub target: String,
    pub analysis_type: String,
    pub findings: String,
    pub sources: Vec<String>,
    pub working_models: Vec<String>,
    pub query_id: String,
    pub timestamp: i64,
}

/// POST /api/intelligence/analyze
pub async fn intelligence(
    State(state): State<AppState>,
    payload: Result<Json<IntelligenceRequest>, JsonRejection>,
) -> Result<Json<IntelligenceResponse>, AppError> {
    let Json(req) = payload?;
    let target = required(req.target, "Target is required")?;
    let analysis_type = or_default(req.analysis_type, "comprehensive");

    let report = run_panel(
        &state,
        &prompt::intelligence_prompt(&target, &analysis_type),
        Personality::IntelligenceAnalyst,
        "Failed to perform intelligence analysis",
    )
    .await?;

    Ok(Json(IntelligenceResponse {
        success: true,
        target,
        analysis_type,
        findings: report.response,
        sources: report.working_models.clone(),
        working_models: report.working_models,
        query_id: report.query_id,
        timestamp: report.timestamp,
    }))
}

// --- OSINT research ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsintRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub depth: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsintResponse {
    pub success: bool,
    pub query: String,
    pub depth: String,
    pub intelligence: String,
    pub sources: Vec<String>,
    pub working_models: Vec<String>,
    pub query_id: String,
    pub timestamp: i64,
}

/// POST /api/osint/research
pub async fn osint(
    State(state): State<AppState>,
    payload: Result<Json<OsintRequest>, JsonRejection>,
) -> Result<Json<OsintResponse>, AppError> {
    let Json(req) = payload?;
    let query = required(req.query, "Query is required")?;
    let depth = or_default(req.depth, "standard");

    let report = run_panel(
        &state,
        &prompt::osint_prompt(&query, &depth),
        Personality::OsintAnalyst,
        "Failed to conduct OSINT research",
    )
    .await?;

    Ok(Json(OsintResponse {
        success: true,
        query,
        depth,
        intelligence: report.response,
        sources: report.working_models.clone(),
        working_models: report.working_models,
        query_id: report.query_id,
        timestamp: report.timestamp,
    }))
}

// --- Business intelligence ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    pub success: bool,
    pub company: String,
    pub analysis_type: String,
    pub industry: String,
    pub intelligence: String,
    pub sources: Vec<String>,
    pub working_models: Vec<String>,
    pub query_id: String,
    pub timestamp: i64,
}

/// POST /api/business/intelligence
pub async fn business(
    State(state): State<AppState>,
    payload: Result<Json<BusinessRequest>, JsonRejection>,
) -> Result<Json<BusinessResponse>, AppError> {
    let Json(req) = payload?;
    let company = required(req.company, "Company is required")?;
    let analysis_type = or_default(req.analysis_type, "competitor");
    let industry = or_default(req.industry, "general");

    let report = run_panel(
        &state,
        &prompt::business_prompt(&company, &analysis_type, Some(&industry)),
        Personality::BusinessAnalyst,
        "Failed to generate business intelligence",
    )
    .await?;

    Ok(Json(BusinessResponse {
        success: true,
        company,
        analysis_type,
        industry,
        intelligence: report.response,
        sources: report.working_models.clone(),
        working_models: report.working_models,
        query_id: report.query_id,
        timestamp: report.timestamp,
    }))
}
