//! GET /api/health - Liveness and roster size.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "operational",
        "system": "intelsphere",
        "version": env!("CARGO_PKG_VERSION"),
        "providers": state.aggregator.registry().len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
