//! Request/response channel and engine serve loop
//!
//! The transport below this layer is out of scope; requests arrive as
//! messages on an in-process channel and responses travel back on oneshot
//! senders. Query, detail, and copy handling sit behind trailing-edge
//! debouncers; execute-item dispatches immediately. Each query carries a
//! generation number and a response whose generation is no longer the
//! latest is dropped, so a superseded in-flight query can never overwrite
//! newer results.

use crate::actions::ActionRegistry;
use crate::cache::DetailCache;
use crate::config::Settings;
use crate::debounce::Debouncer;
use crate::details::DetailResolver;
use crate::error::Error;
use crate::plugins::PluginRegistry;
use crate::query::ParsedQuery;
use crate::results::ResultItem;
use crate::search::SearchExecutor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Inbound message kinds
pub enum EngineRequest {
    /// Query command: ranked result sequence in response
    Query {
        phrase: String,
        respond: oneshot::Sender<Vec<ResultItem>>,
    },
    /// Item-detail request: resolved detail content in response
    ItemDetails {
        item: ResultItem,
        respond: oneshot::Sender<Result<String, Error>>,
    },
    /// Execute-item command: side effect only
    ExecuteItem {
        action: String,
        item: ResultItem,
        is_super_mod: bool,
        is_alt_mod: bool,
    },
    /// Copy-item command: side effect only
    CopyItem { item: ResultItem },
}

/// Cloneable sender side of the engine channel
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineRequest>,
}

impl EngineHandle {
    /// Submit a query phrase and await the ranked results.
    ///
    /// Returns `Error::Superseded` when a newer query collapsed or
    /// outpaced this one, and `Error::ChannelClosed` when the serve loop
    /// has exited.
    pub async fn query(&self, phrase: impl Into<String>) -> Result<Vec<ResultItem>, Error> {
        let (respond, rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Query {
                phrase: phrase.into(),
                respond,
            })
            .map_err(|_| Error::ChannelClosed)?;
        rx.await.map_err(|_| self.dropped_response_error())
    }

    /// Request detail content for a selected item
    pub async fn item_details(&self, item: ResultItem) -> Result<String, Error> {
        let (respond, rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::ItemDetails { item, respond })
            .map_err(|_| Error::ChannelClosed)?;
        rx.await.map_err(|_| self.dropped_response_error())?
    }

    /// Fire an item's action with the modifier-selected argument
    pub fn execute_item(
        &self,
        action: impl Into<String>,
        item: ResultItem,
        is_super_mod: bool,
        is_alt_mod: bool,
    ) -> Result<(), Error> {
        self.tx
            .send(EngineRequest::ExecuteItem {
                action: action.into(),
                item,
                is_super_mod,
                is_alt_mod,
            })
            .map_err(|_| Error::ChannelClosed)
    }

    /// Copy an item's payload
    pub fn copy_item(&self, item: ResultItem) -> Result<(), Error> {
        self.tx
            .send(EngineRequest::CopyItem { item })
            .map_err(|_| Error::ChannelClosed)
    }

    /// Classify a dropped response: a dead serve loop means the engine is
    /// unavailable, a live one means a newer request replaced this one.
    fn dropped_response_error(&self) -> Error {
        if self.tx.is_closed() {
            Error::ChannelClosed
        } else {
            Error::Superseded
        }
    }
}

struct QueryJob {
    phrase: String,
    generation: u64,
    respond: oneshot::Sender<Vec<ResultItem>>,
}

struct DetailJob {
    item: ResultItem,
    respond: oneshot::Sender<Result<String, Error>>,
}

/// The assembled engine: registry, executor, resolver, and action table
/// behind one request channel
pub struct Engine {
    executor: SearchExecutor,
    resolver: DetailResolver,
    actions: ActionRegistry,
    debounce_window: Duration,
    generation: AtomicU64,
}

impl Engine {
    /// Wire the engine from its collaborators and settings
    pub fn new(registry: Arc<PluginRegistry>, settings: &Settings, actions: ActionRegistry) -> Self {
        let cache = Arc::new(DetailCache::with_capacity(
            settings.cache_dir(),
            settings.cache.max_entries,
        ));
        let executor = SearchExecutor::new(registry.clone())
            .with_max_results(settings.search.max_results)
            .with_score_threshold(settings.search.score_threshold);
        let resolver = DetailResolver::new(registry, cache);

        Self {
            executor,
            resolver,
            actions,
            debounce_window: Duration::from_millis(settings.search.debounce_ms),
            generation: AtomicU64::new(0),
        }
    }

    /// Spawn the serve loop and return the handle for submitting requests
    pub fn start(self) -> EngineHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(self);
        tokio::spawn(engine.serve(rx));
        EngineHandle { tx }
    }

    async fn serve(self: Arc<Self>, mut rx: mpsc::UnboundedReceiver<EngineRequest>) {
        info!("engine serving (debounce window {:?})", self.debounce_window);

        let query_debouncer = {
            let engine = self.clone();
            Debouncer::new(self.debounce_window, move |job: QueryJob| {
                let engine = engine.clone();
                async move { engine.run_query(job).await }
            })
        };
        let detail_debouncer = {
            let engine = self.clone();
            Debouncer::new(self.debounce_window, move |job: DetailJob| {
                let engine = engine.clone();
                async move { engine.run_details(job).await }
            })
        };
        let copy_debouncer = {
            let engine = self.clone();
            Debouncer::new(self.debounce_window, move |item: ResultItem| {
                let engine = engine.clone();
                async move { engine.actions.copy_item(&item) }
            })
        };

        while let Some(request) = rx.recv().await {
            match request {
                EngineRequest::Query { phrase, respond } => {
                    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                    query_debouncer.call(QueryJob {
                        phrase,
                        generation,
                        respond,
                    });
                }
                EngineRequest::ItemDetails { item, respond } => {
                    detail_debouncer.call(DetailJob { item, respond });
                }
                EngineRequest::ExecuteItem {
                    action,
                    item,
                    is_super_mod,
                    is_alt_mod,
                } => {
                    self.actions
                        .execute_item(&action, &item, is_super_mod, is_alt_mod);
                }
                EngineRequest::CopyItem { item } => {
                    copy_debouncer.call(item);
                }
            }
        }
    }

    async fn run_query(&self, job: QueryJob) {
        let query = ParsedQuery::parse(&job.phrase);
        let results = self.executor.execute(&query).await;

        // A newer query arrived while this one was aggregating: drop the
        // stale response instead of delivering it.
        if self.generation.load(Ordering::SeqCst) != job.generation {
            debug!("dropping superseded results for '{}'", job.phrase);
            return;
        }
        let _ = job.respond.send(results);
    }

    async fn run_details(&self, job: DetailJob) {
        let outcome = self.resolver.resolve(&job.item).await;
        let _ = job.respond.send(outcome);
    }
}
