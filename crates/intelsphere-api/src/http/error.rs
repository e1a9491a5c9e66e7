//! Application error type mapping to HTTP status codes.
//!
//! Every error body has the shape `{"success": false, "error": ..., "details": ...}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use intelsphere_types::error::AggregateError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request input.
    Validation(String),
    /// Fan-out failed; `context` names the operation for the `error` field.
    Aggregate {
        context: &'static str,
        source: AggregateError,
    },
    /// Generic internal error.
    Internal(String),
}

impl AppError {
    pub fn aggregate(context: &'static str, source: AggregateError) -> Self {
        AppError::Aggregate { context, source }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Aggregate {
                source: AggregateError::InvalidInput(_),
                ..
            } => StatusCode::BAD_REQUEST,
            AppError::Aggregate {
                source: AggregateError::NoProviders | AggregateError::NoAuthenticData { .. },
                ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Validation(msg) => json!({
                "success": false,
                "error": msg,
                "details": msg,
            }),
            AppError::Aggregate {
                context,
                source: source @ AggregateError::NoAuthenticData { failures, .. },
            } => {
                tracing::warn!(error = %source, "{context}");
                json!({
                    "success": false,
                    "error": context,
                    "details": source.to_string(),
                    "failures": failures,
                })
            }
            AppError::Aggregate { context, source } => {
                tracing::warn!(error = %source, "{context}");
                json!({
                    "success": false,
                    "error": context,
                    "details": source.to_string(),
                })
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                json!({
                    "success": false,
                    "error": "Internal server error",
                    "details": msg,
                })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intelsphere_types::error::ProviderFailure;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("Message is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::aggregate("x", AggregateError::InvalidInput("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::aggregate("x", AggregateError::NoProviders).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        let no_data = AggregateError::NoAuthenticData {
            attempted: 1,
            failures: vec![ProviderFailure {
                provider: "OpenAI-1".into(),
                error: "authentication failed".into(),
                credential: true,
            }],
        };
        assert_eq!(
            AppError::aggregate("x", no_data).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_invalid_input_details_carry_the_message() {
        let response = AppError::aggregate(
            "Failed to process chat request",
            AggregateError::InvalidInput("prompt is empty".into()),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Failed to process chat request");
        assert_eq!(body["details"], "invalid input: prompt is empty");
    }
}
