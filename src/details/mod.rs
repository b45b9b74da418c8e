//! Detail resolution
//!
//! Resolves rich content for one selected item: cache first, then the
//! originating plugin's detail entry point, storing the result before
//! delivery. After the first successful resolution, repeated requests for
//! an identical item payload never re-invoke the plugin.

use crate::cache::DetailCache;
use crate::error::Error;
use crate::plugins::PluginRegistry;
use crate::results::ResultItem;
use std::sync::Arc;
use tracing::debug;

/// Resolver for item detail requests
pub struct DetailResolver {
    registry: Arc<PluginRegistry>,
    cache: Arc<DetailCache>,
}

impl DetailResolver {
    pub fn new(registry: Arc<PluginRegistry>, cache: Arc<DetailCache>) -> Self {
        Self { registry, cache }
    }

    /// Resolve detail content for `item`.
    ///
    /// The cache namespace derives from the originating plugin's path; the
    /// key is the item's canonical serialization, so payloads that differ
    /// only in field order share an entry.
    pub async fn resolve(&self, item: &ResultItem) -> Result<String, Error> {
        let path = item
            .plugin_path
            .as_deref()
            .ok_or_else(|| Error::UnknownPlugin("<untagged item>".into()))?;
        let provider = self
            .registry
            .get_by_path(path)
            .ok_or_else(|| Error::UnknownPlugin(path.to_string()))?
            .clone();

        let namespace = provider.descriptor().cache_namespace();
        let key = item.identity();
        debug!("resolving details in namespace {namespace}");

        self.cache
            .get_or_resolve(&namespace, &key, || async move {
                provider.item_details(item).await
            })
            .await
    }
}
