//! Search execution and ranking
//!
//! Fans out one provider call per routing decision, waits for the whole
//! set, then scores, sorts, filters, and caps the merged candidates.

use super::router::{route, QueryMode, RoutedPlugin};
use crate::plugins::PluginRegistry;
use crate::query::ParsedQuery;
use crate::results::ResultItem;
use crate::scoring::score;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Executor coordinating queries across all routed plugins
pub struct SearchExecutor {
    registry: Arc<PluginRegistry>,
    max_results: usize,
    score_threshold: f64,
}

impl SearchExecutor {
    /// Create a new executor with the crate defaults
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            max_results: crate::DEFAULT_MAX_RESULTS,
            score_threshold: crate::SCORE_THRESHOLD,
        }
    }

    /// Cap on the number of returned items
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Relevance filter threshold; items with 0 < score <= threshold are
    /// dropped
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Execute a query: route, fan out concurrently, rank.
    ///
    /// Always returns a list, possibly empty. A failing provider is
    /// isolated: it logs a warning and contributes nothing instead of
    /// blanking the whole batch.
    pub async fn execute(&self, query: &ParsedQuery) -> Vec<ResultItem> {
        let routed = route(query, &self.registry);
        if routed.is_empty() {
            return Vec::new();
        }

        info!(
            "dispatching '{}' to {} plugin(s)",
            query.phrase,
            routed.len()
        );

        let futures: Vec<_> = routed
            .iter()
            .map(|decision| self.query_provider(decision, &query.keyword))
            .collect();

        // Provider calls are issued in routing order and may complete in
        // any order; ranking below is order-independent.
        let batches = join_all(futures).await;
        let merged: Vec<ResultItem> = batches.into_iter().flatten().collect();

        self.rank(merged, &query.keyword)
    }

    /// Query one routed plugin, isolating any failure
    async fn query_provider(&self, decision: &RoutedPlugin, keyword: &str) -> Vec<ResultItem> {
        let descriptor = decision.provider.descriptor();
        let name = descriptor.name.clone();
        let path = descriptor.path.clone();

        let outcome = match decision.mode {
            QueryMode::Helper => decision.provider.query_helper(keyword).await,
            QueryMode::Results => decision.provider.query_results(&decision.args).await,
        };

        match outcome {
            Ok(mut items) => {
                debug!("plugin {} returned {} item(s)", name, items.len());
                for item in &mut items {
                    if item.plugin_path.is_none() {
                        item.plugin_path = Some(path.clone());
                    }
                }
                items
            }
            Err(e) => {
                warn!("plugin {} failed: {}", name, e);
                Vec::new()
            }
        }
    }

    /// Score, sort, filter, and truncate the merged candidates.
    ///
    /// The sort is stable, so equal scores keep their provider order. An
    /// item scores 0 when its title carries no measurable match, and such
    /// items pass the filter unfiltered; weak nonzero matches at or below
    /// the threshold are dropped.
    fn rank(&self, items: Vec<ResultItem>, keyword: &str) -> Vec<ResultItem> {
        let mut scored: Vec<(f64, ResultItem)> = items
            .into_iter()
            .map(|item| (score(&item.title, keyword), item))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .filter(|(s, _)| *s == 0.0 || *s > self.score_threshold)
            .map(|(_, item)| item)
            .take(self.max_results)
            .collect()
    }
}
