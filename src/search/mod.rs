//! Query dispatch and ranking
//!
//! Routes a parsed query to the participating plugins, fans out to their
//! providers concurrently, and ranks the merged candidates.

mod executor;
mod router;

pub use executor::SearchExecutor;
pub use router::{route, QueryMode, RoutedPlugin};
