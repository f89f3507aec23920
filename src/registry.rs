//! Provider registry
//!
//! Thread-safe collection of registered providers, keyed by provider
//! name. Reads proceed concurrently; registration takes the write lock.

use crate::provider::Provider;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of available providers
///
/// Registration is last-write-wins per name. Model resolution returns
/// the first provider claiming the model; iteration order over the
/// underlying map is unspecified, so providers must not register
/// overlapping model claims.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, Arc<dyn Provider>>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a provider under its own name, replacing any previous entry
    pub fn register(&self, provider: Arc<dyn Provider>) {
        let name = provider.name().to_string();
        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());
        providers.insert(name, provider);
    }

    /// Look up a provider by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        providers.get(name).cloned()
    }

    /// Find a provider that supports the given model
    #[must_use]
    pub fn get_for_model(&self, model: &str) -> Option<Arc<dyn Provider>> {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        providers
            .values()
            .find(|p| p.supports_model(model))
            .cloned()
    }

    /// Snapshot of all registered providers, order unspecified
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn Provider>> {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        providers.values().cloned().collect()
    }

    /// Number of registered providers
    #[must_use]
    pub fn len(&self) -> usize {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        providers.len()
    }

    /// True if no providers are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<&str> = providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}
