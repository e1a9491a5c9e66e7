//! Shared domain types for IntelSphere.
//!
//! Request/response shapes for LLM providers, the gateway configuration,
//! and the aggregation error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
