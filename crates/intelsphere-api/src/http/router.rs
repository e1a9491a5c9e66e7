//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`. Middleware: CORS, request tracing.
//!
//! When `server.static_dir` exists, the built dashboard is served from it.
//! API routes take priority; unknown paths fall through to the SPA's
//! `index.html` for client-side routing.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// CORS layer for the configured origins; `"*"` allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);
    let static_dir = state.config.server.static_dir.clone();

    let api_routes = Router::new()
        // Chat
        .route("/chat", post(handlers::chat::chat))
        .route("/revolutionary-ai", post(handlers::chat::revolutionary_ai))
        .route("/enhanced-chat", post(handlers::chat::enhanced_chat))
        // Analysis panels
        .route("/intelligence/analyze", post(handlers::analysis::intelligence))
        .route("/osint/research", post(handlers::analysis::osint))
        .route("/business/intelligence", post(handlers::analysis::business))
        .route("/sentiment-analysis", post(handlers::sentiment::analyze))
        // Providers
        .route("/models/status", get(handlers::models::status))
        .route("/models/diagnostic", post(handlers::models::diagnostic))
        .route("/health", get(handlers::health::health));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(dir) = static_dir.filter(|d| std::path::Path::new(d).is_dir()) {
        let index_path = std::path::Path::new(&dir).join("index.html");
        let serve_dir = ServeDir::new(&dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %dir, "Dashboard static file serving enabled");
    }

    router
}
