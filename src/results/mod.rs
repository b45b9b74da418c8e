//! Result item types produced by plugins and ranked by the engine

mod types;

pub use types::*;
