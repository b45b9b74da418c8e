//! Plugin module
//!
//! Defines the provider trait each plugin implements, the immutable
//! descriptor the router consults, and the registry resolved once at
//! startup into a typed table.

mod registry;
mod traits;

pub mod static_items;

pub use registry::PluginRegistry;
pub use traits::*;
