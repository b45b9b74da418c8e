//! Built-in provider serving a fixed item list from a manifest file
//!
//! Lets the binary do useful work without any external plugins: the user
//! points the settings at a JSON manifest of items (bookmarks, commands,
//! snippets) and gets them routed, ranked, and capped like any other
//! plugin's output.

use crate::error::Error;
use crate::plugins::{PluginDescriptor, Provider};
use crate::results::ResultItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Manifest file format: descriptor fields plus the served items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticItemsManifest {
    pub name: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default = "default_is_core")]
    pub is_core: bool,
    pub items: Vec<ResultItem>,
}

fn default_is_core() -> bool {
    true
}

/// Provider backed by a static manifest
pub struct StaticItemsProvider {
    descriptor: PluginDescriptor,
    items: Vec<ResultItem>,
}

impl StaticItemsProvider {
    /// Load a manifest from disk
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        let manifest: StaticItemsManifest = serde_json::from_str(&raw)?;
        Ok(Self::from_manifest(&path.to_string_lossy(), manifest))
    }

    /// Build a provider from an already-parsed manifest
    pub fn from_manifest(path: &str, manifest: StaticItemsManifest) -> Self {
        let mut descriptor = PluginDescriptor::new(path, manifest.name);
        descriptor.is_core = manifest.is_core;
        descriptor.keyword = manifest.keyword;

        // Tag items with the originating plugin so detail lookups can find
        // their way back.
        let items = manifest
            .items
            .into_iter()
            .map(|item| {
                if item.plugin_path.is_none() {
                    item.with_plugin_path(&descriptor.path)
                } else {
                    item
                }
            })
            .collect();

        Self { descriptor, items }
    }
}

#[async_trait]
impl Provider for StaticItemsProvider {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    /// Static items are returned wholesale; relevance filtering happens in
    /// the ranking pass.
    async fn query_results(&self, _args: &[String]) -> Result<Vec<ResultItem>, Error> {
        Ok(self.items.clone())
    }

    async fn query_helper(&self, keyword: &str) -> Result<Vec<ResultItem>, Error> {
        let hint = ResultItem::new(format!("{}: type to filter", self.descriptor.name))
            .with_subtitle(format!(
                "{keyword} <query> searches {} entries",
                self.items.len()
            ));
        Ok(vec![hint])
    }

    async fn item_details(&self, item: &ResultItem) -> Result<String, Error> {
        let mut detail = format!("# {}\n", item.title);
        if let Some(subtitle) = &item.subtitle {
            detail.push_str(&format!("\n{subtitle}\n"));
        }
        if let Some(arg) = &item.arg {
            detail.push_str(&format!("\n`{arg}`\n"));
        }
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> StaticItemsManifest {
        serde_json::from_value(json!({
            "name": "Bookmarks",
            "keyword": "bm",
            "items": [
                { "title": "Rust stdlib docs", "arg": "https://doc.rust-lang.org/std" },
                { "title": "Crates.io", "arg": "https://crates.io" }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn serves_all_items_tagged_with_plugin_path() {
        let provider = StaticItemsProvider::from_manifest("bookmarks.json", manifest());
        let items = provider.query_results(&[]).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items
            .iter()
            .all(|i| i.plugin_path.as_deref() == Some("bookmarks.json")));
    }

    #[tokio::test]
    async fn helper_mentions_the_keyword() {
        let provider = StaticItemsProvider::from_manifest("bookmarks.json", manifest());
        let hints = provider.query_helper("bm").await.unwrap();
        assert_eq!(hints.len(), 1);
        assert!(hints[0].subtitle.as_deref().unwrap().contains("bm"));
    }

    #[tokio::test]
    async fn details_render_title_and_arg() {
        let provider = StaticItemsProvider::from_manifest("bookmarks.json", manifest());
        let items = provider.query_results(&[]).await.unwrap();
        let detail = provider.item_details(&items[0]).await.unwrap();
        assert!(detail.contains("Rust stdlib docs"));
        assert!(detail.contains("doc.rust-lang.org"));
    }

    #[test]
    fn manifest_defaults_to_core() {
        let m: StaticItemsManifest =
            serde_json::from_value(json!({ "name": "N", "items": [] })).unwrap();
        assert!(m.is_core);
    }
}
