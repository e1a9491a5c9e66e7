//! LLM provider abstractions for IntelSphere.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `ProviderRegistry`: the ordered roster a fan-out runs against

pub mod box_provider;
pub mod provider;
pub mod registry;
