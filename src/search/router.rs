//! Query routing
//!
//! Selects which plugins participate in a query and in which mode.

use crate::plugins::{PluginRegistry, Provider};
use crate::query::ParsedQuery;
use std::sync::Arc;

/// How a routed plugin should be queried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// The user typed the plugin's keyword with no argument yet; the plugin
    /// is asked for usage/hint content
    Helper,
    /// Normal candidate search
    Results,
}

/// One routing decision: a provider, its mode, and the argument tokens it
/// should receive
#[derive(Clone)]
pub struct RoutedPlugin {
    pub provider: Arc<dyn Provider>,
    pub mode: QueryMode,
    pub args: Vec<String>,
}

/// Route a parsed query against the registry.
///
/// A plugin matches when it has no keyword (always on) or its keyword
/// equals the query's first token. When nothing matches, the query falls
/// back to core plugins only, each receiving the full token list, so an
/// unrecognized leading word still searches core functionality.
pub fn route(query: &ParsedQuery, registry: &PluginRegistry) -> Vec<RoutedPlugin> {
    let matched: Vec<&Arc<dyn Provider>> = registry
        .iter()
        .filter(|p| match &p.descriptor().keyword {
            None => true,
            Some(keyword) => *keyword == query.keyword,
        })
        .collect();

    if !matched.is_empty() {
        return matched
            .into_iter()
            .map(|provider| {
                let descriptor = provider.descriptor();
                let (mode, args) = match &descriptor.keyword {
                    // Keyword typed but no argument yet: show usage.
                    Some(_) if query.query_string.is_empty() => {
                        (QueryMode::Helper, query.args.clone())
                    }
                    // Keyword matched with arguments: keyword is stripped.
                    Some(_) => (QueryMode::Results, query.args.clone()),
                    // Keyword-less plugins get the full token list.
                    None => (QueryMode::Results, query.fractions.clone()),
                };
                RoutedPlugin {
                    provider: provider.clone(),
                    mode,
                    args,
                }
            })
            .collect();
    }

    registry
        .iter()
        .filter(|p| p.descriptor().is_core)
        .map(|provider| RoutedPlugin {
            provider: provider.clone(),
            mode: QueryMode::Results,
            args: query.fractions.clone(),
        })
        .collect()
}
