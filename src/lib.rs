//! Lumen: a launcher query dispatch and ranking engine
//!
//! A typed phrase is routed to the registered plugins, their candidates are
//! collected concurrently, ranked by fuzzy relevance against the query
//! keyword, and returned as a bounded ordered list. A secondary path
//! resolves detail content for a selected item through a persistent cache.

pub mod actions;
pub mod cache;
pub mod channel;
pub mod config;
pub mod debounce;
pub mod details;
pub mod error;
pub mod plugins;
pub mod query;
pub mod results;
pub mod scoring;
pub mod search;

pub use channel::{Engine, EngineHandle, EngineRequest};
pub use config::Settings;
pub use error::Error;
pub use plugins::{PluginDescriptor, PluginRegistry, Provider};
pub use query::ParsedQuery;
pub use results::ResultItem;
pub use search::SearchExecutor;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cap on the returned result list
pub const DEFAULT_MAX_RESULTS: usize = 8;

/// Default debounce quiescence window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Relevance filter threshold: items scoring in (0, SCORE_THRESHOLD] are
/// dropped, zero-score items pass through unfiltered
pub const SCORE_THRESHOLD: f64 = 0.25;
