//! Plugin traits and descriptor types

use crate::error::Error;
use crate::results::ResultItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Immutable plugin metadata, loaded once at startup.
///
/// The `keyword` is fixed for the process lifetime; the router relies on
/// this when partitioning plugins per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Identifier/location of the plugin, also the base of its cache
    /// namespace
    pub path: String,
    /// Display name
    pub name: String,
    /// Core plugins participate in keyword-less fallback queries
    #[serde(default)]
    pub is_core: bool,
    /// Optional routing keyword; when set the plugin only activates for
    /// queries whose first token equals it
    #[serde(default)]
    pub keyword: Option<String>,
    /// Plugin-defined metadata, passed through to items uninterpreted
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub action: Value,
}

impl PluginDescriptor {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            is_core: false,
            keyword: None,
            schema: Value::Null,
            action: Value::Null,
        }
    }

    pub fn core(mut self) -> Self {
        self.is_core = true;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Cache namespace for item details: the basename of the plugin path
    /// with an `-item-details` suffix.
    pub fn cache_namespace(&self) -> String {
        let base = Path::new(&self.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.clone());
        format!("{base}-item-details")
    }
}

/// Capability interface every plugin implements.
///
/// Resolved once at startup into the registry; the engine never loads
/// plugin code at query time.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The plugin's immutable descriptor
    fn descriptor(&self) -> &PluginDescriptor;

    /// Produce candidate results for the given argument tokens
    async fn query_results(&self, args: &[String]) -> Result<Vec<ResultItem>, Error>;

    /// Produce usage/hint content shown when the user has typed the
    /// plugin's keyword but no argument yet
    async fn query_helper(&self, _keyword: &str) -> Result<Vec<ResultItem>, Error> {
        Ok(Vec::new())
    }

    /// Resolve rich detail content for one selected item
    async fn item_details(&self, _item: &ResultItem) -> Result<String, Error> {
        Err(Error::DetailsUnsupported(self.descriptor().name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_namespace_uses_path_basename() {
        let d = PluginDescriptor::new("/opt/lumen/plugins/files", "Files");
        assert_eq!(d.cache_namespace(), "files-item-details");
    }

    #[test]
    fn cache_namespace_of_bare_path() {
        let d = PluginDescriptor::new("calc", "Calculator");
        assert_eq!(d.cache_namespace(), "calc-item-details");
    }
}
