//! Plugin registry
//!
//! Typed table of providers, built at startup and read-only afterwards.
//! Shared across the engine via `Arc`; no locking is needed because the
//! set of plugins never changes for the process lifetime.

use super::traits::Provider;
use std::sync::Arc;

/// Registry of all loaded plugins
#[derive(Default)]
pub struct PluginRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Registration order is preserved; the router
    /// and aggregator iterate in this order.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.push(provider);
    }

    /// Iterate providers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Provider>> {
        self.providers.iter()
    }

    /// Look up the provider whose descriptor path matches
    pub fn get_by_path(&self, path: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.descriptor().path == path)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::plugins::PluginDescriptor;
    use crate::results::ResultItem;
    use async_trait::async_trait;

    struct Dummy(PluginDescriptor);

    #[async_trait]
    impl Provider for Dummy {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.0
        }

        async fn query_results(&self, _args: &[String]) -> Result<Vec<ResultItem>, Error> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn lookup_by_path() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(Dummy(PluginDescriptor::new("a", "A"))));
        registry.register(Arc::new(Dummy(PluginDescriptor::new("b", "B"))));

        assert_eq!(registry.len(), 2);
        assert!(registry.get_by_path("b").is_some());
        assert!(registry.get_by_path("c").is_none());
    }

    #[test]
    fn preserves_registration_order() {
        let mut registry = PluginRegistry::new();
        for path in ["one", "two", "three"] {
            registry.register(Arc::new(Dummy(PluginDescriptor::new(path, path))));
        }
        let order: Vec<_> = registry.iter().map(|p| p.descriptor().path.clone()).collect();
        assert_eq!(order, vec!["one", "two", "three"]);
    }
}
