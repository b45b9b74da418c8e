//! Error types for the query engine

use thiserror::Error;

/// Errors surfaced by the engine and its components
#[derive(Debug, Error)]
pub enum Error {
    /// A provider's query or helper call failed
    #[error("provider '{plugin}' failed: {message}")]
    Provider { plugin: String, message: String },

    /// A detail request referenced a plugin not present in the registry
    #[error("unknown plugin path: {0}")]
    UnknownPlugin(String),

    /// The originating plugin has no detail entry point
    #[error("plugin '{0}' does not provide item details")]
    DetailsUnsupported(String),

    /// Detail resolution failed (provider error or a coalesced waiter
    /// observing the leader's failure)
    #[error("detail resolution failed: {0}")]
    Details(String),

    /// Cache persistence failed; fatal to the single detail request
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration could not be loaded or parsed
    #[error("config error: {0}")]
    Config(String),

    /// The response was dropped because a newer query superseded it
    #[error("request superseded by a newer query")]
    Superseded,

    /// The engine's request channel is closed
    #[error("engine unavailable")]
    ChannelClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for provider failures
    pub fn provider(plugin: impl Into<String>, message: impl ToString) -> Self {
        Self::Provider {
            plugin: plugin.into(),
            message: message.to_string(),
        }
    }
}
