//! Provider registry: the ordered roster a fan-out runs against.

use std::sync::Arc;

use super::box_provider::BoxLlmProvider;

/// Ordered collection of boxed providers.
///
/// Order is the configured roster order. Providers are held behind `Arc`
/// so each fan-out task can own a handle without cloning the client.
#[derive(Debug, Default, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<BoxLlmProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. A provider with the same name is replaced in place.
    pub fn register(&mut self, provider: BoxLlmProvider) {
        let provider = Arc::new(provider);
        match self
            .providers
            .iter_mut()
            .find(|p| p.name() == provider.name())
        {
            Some(slot) => *slot = provider,
            None => self.providers.push(provider),
        }
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Option<&Arc<BoxLlmProvider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    pub fn providers(&self) -> &[Arc<BoxLlmProvider>] {
        &self.providers
    }

    /// Registered provider names in roster order.
    pub fn list_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
