//! Business logic for IntelSphere.
//!
//! Defines the provider "port" (`LlmProvider`) that the infrastructure layer
//! implements, plus the fan-out aggregator built on top of it. Depends only
//! on `intelsphere-types` -- never on `intelsphere-infra` or any HTTP crate.

pub mod aggregate;
pub mod llm;
pub mod prompt;
pub mod sentiment;
