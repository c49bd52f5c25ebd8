//! The transmit seam between the bridge and the host's message ports.

use crate::registry::PortId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A message crossing the boundary to the consumer side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMessage {
    /// A serialized event payload (or a raw identifier for query changes).
    Text(String),
    /// A token naming a pending work unit to run through the trampoline.
    WorkToken(u64),
}

/// The host's post primitive.
///
/// Posting is fire-and-forget: `false` means the endpoint rejected the
/// message (closed or invalid port). There is no retry and no further
/// failure channel.
pub trait PortTransmitter: Send + Sync {
    /// Posts a message to an endpoint. Returns whether the endpoint
    /// accepted it.
    fn post(&self, port: PortId, message: &PortMessage) -> bool;
}

/// A transmitter that records every post, for tests.
#[derive(Default)]
pub struct MockTransmitter {
    posted: Mutex<Vec<(PortId, PortMessage)>>,
    fail: AtomicBool,
}

impl MockTransmitter {
    /// Creates a mock transmitter that accepts every post.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent posts report failure (and not be recorded).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of everything posted so far, in post order.
    pub fn posted(&self) -> Vec<(PortId, PortMessage)> {
        self.posted.lock().clone()
    }

    /// Returns the messages posted to one endpoint, in post order.
    pub fn posted_to(&self, port: PortId) -> Vec<PortMessage> {
        self.posted
            .lock()
            .iter()
            .filter(|(p, _)| *p == port)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl PortTransmitter for MockTransmitter {
    fn post(&self, port: PortId, message: &PortMessage) -> bool {
        if self.fail.load(Ordering::SeqCst) {
            return false;
        }
        self.posted.lock().push((port, message.clone()));
        true
    }
}
