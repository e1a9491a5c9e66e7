//! POST /api/sentiment-analysis - Multi-provider sentiment vote.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use intelsphere_core::aggregate::AggregateOptions;
use intelsphere_core::aggregate::fanout::Settled;
use intelsphere_core::prompt;
use intelsphere_core::sentiment::{Sentiment, SentimentVote, consensus, parse_verdict};
use intelsphere_types::error::AggregateError;

use super::chat::required;
use crate::http::error::AppError;
use crate::state::AppState;

const CONTEXT: &str = "Failed to analyze sentiment";

/// Verdicts are short JSON objects.
const VERDICT_MAX_TOKENS: u32 = 400;

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
    pub success: bool,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub emotional_intensity: f64,
    pub disagreement_score: f64,
    pub votes: Vec<SentimentVote>,
    pub models_used: Vec<String>,
    pub timestamp: i64,
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<SentimentResponse>, AppError> {
    let Json(req) = payload?;
    let text = required(req.text, "Text is required")?;

    let options = AggregateOptions {
        system: Some(prompt::sentiment_system_prompt().to_string()),
        temperature: Some(0.0),
        max_tokens: Some(VERDICT_MAX_TOKENS),
    };
    let settled = state
        .aggregator
        .settle(&prompt::sentiment_user_prompt(&text), &options)
        .await
        .map_err(|e| AppError::aggregate(CONTEXT, e))?;

    if !settled.iter().any(Settled::is_success) {
        return Err(AppError::aggregate(
            CONTEXT,
            AggregateError::NoAuthenticData {
                attempted: settled.len(),
                failures: settled.iter().filter_map(Settled::failure).collect(),
            },
        ));
    }

    let votes: Vec<SentimentVote> = settled
        .into_iter()
        .filter(Settled::is_success)
        .filter_map(|s| {
            let verdict = parse_verdict(&s.response.response);
            if verdict.is_none() {
                tracing::debug!(provider = %s.response.provider, "Reply had no sentiment verdict");
            }
            verdict.map(|verdict| SentimentVote {
                provider: s.response.provider,
                verdict,
            })
        })
        .collect();

    let Some(result) = consensus(&votes) else {
        return Err(AppError::Internal(
            "no provider returned a parseable sentiment verdict".to_string(),
        ));
    };

    Ok(Json(SentimentResponse {
        success: true,
        sentiment: result.sentiment,
        confidence: result.confidence,
        emotional_intensity: result.emotional_intensity,
        disagreement_score: result.disagreement_score,
        models_used: votes.iter().map(|v| v.provider.clone()).collect(),
        votes,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}
