//! HTTP API layer for IntelSphere.
//!
//! Axum JSON API under `/api/` with CORS, request tracing, and optional
//! static serving of the dashboard build.

pub mod error;
pub mod handlers;
pub mod router;
