//! Error types for the bridge.

use crate::registry::EventCategory;
use std::time::Duration;
use thiserror::Error;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur while posting events or waiting for decisions.
///
/// None of these are ever surfaced to the engine: listeners drop the event
/// and log, decision hooks fall back to a configured default.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The event payload could not be serialized.
    #[error("event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// No port has been registered for the event category.
    #[error("no port registered for {0:?}")]
    PortNotRegistered(EventCategory),

    /// The transmit primitive rejected the message.
    #[error("post to port {port} failed for {category:?}")]
    TransmitFailed {
        /// Category whose port rejected the message.
        category: EventCategory,
        /// The raw port handle.
        port: u64,
    },

    /// The consumer side did not answer within the configured timeout.
    #[error("decision timed out after {waited:?}")]
    DecisionTimeout {
        /// How long the engine thread was blocked.
        waited: Duration,
    },
}
