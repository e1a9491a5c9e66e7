//! Infrastructure layer for IntelSphere.
//!
//! Contains the concrete [`LlmProvider`](intelsphere_core::llm::provider::LlmProvider)
//! clients for each supported vendor, the provider factory that turns a
//! roster into a registry, API-key resolution, and config file loading.

pub mod config;
pub mod llm;
pub mod secret;
