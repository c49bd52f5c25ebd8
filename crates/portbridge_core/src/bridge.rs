//! The bridge façade tying registry, transmitter, and work table together.

use crate::config::BridgeConfig;
use crate::decision::PendingDecision;
use crate::error::{BridgeError, BridgeResult};
use crate::event::{DatabaseChange, DocumentChange, ReplicatorStatusEvent};
use crate::registry::{EventCategory, PortBindings, PortId, PortRegistry};
use crate::transmit::{PortMessage, PortTransmitter};
use crate::work::{WorkTable, WorkUnit};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

/// Adapts engine callbacks to the host's message ports.
///
/// Event notifications are fire-and-forget on the calling engine thread.
/// Decision requests block the calling engine thread until the consumer
/// side answers through [`Bridge::execute_work`], or until the configured
/// timeout expires.
pub struct Bridge {
    config: RwLock<BridgeConfig>,
    registry: PortRegistry,
    transmitter: Arc<dyn PortTransmitter>,
    work: WorkTable,
}

impl Bridge {
    /// Creates a bridge over a transmit primitive.
    pub fn new(config: BridgeConfig, transmitter: Arc<dyn PortTransmitter>) -> Self {
        Self {
            config: RwLock::new(config),
            registry: PortRegistry::new(),
            transmitter,
            work: WorkTable::new(),
        }
    }

    /// Replaces all port bindings atomically.
    pub fn register_ports(&self, bindings: PortBindings) {
        self.registry.register(bindings);
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> BridgeConfig {
        self.config.read().clone()
    }

    /// Adjusts the decision timeout. `None` waits forever.
    pub fn set_decision_timeout(&self, timeout: Option<Duration>) {
        self.config.write().decision_timeout = timeout;
    }

    /// Sets the value a replication filter falls back to when its decision
    /// fails or times out.
    pub fn set_filter_fallback(&self, fallback: bool) {
        self.config.write().filter_fallback = fallback;
    }

    fn post(&self, category: EventCategory, message: PortMessage) -> BridgeResult<PortId> {
        let port = self
            .registry
            .port(category)
            .ok_or(BridgeError::PortNotRegistered(category))?;
        if self.transmitter.post(port, &message) {
            Ok(port)
        } else {
            Err(BridgeError::TransmitFailed {
                category,
                port: port.as_u64(),
            })
        }
    }

    /// Posts a database-level change event.
    pub fn notify_database_change(
        &self,
        database_id: &str,
        doc_ids: Vec<String>,
    ) -> BridgeResult<()> {
        let event = DatabaseChange {
            database_id: database_id.to_owned(),
            doc_ids,
        };
        self.post(EventCategory::DatabaseChange, PortMessage::Text(event.to_json()?))?;
        Ok(())
    }

    /// Posts a single-document change event.
    pub fn notify_document_change(
        &self,
        database_id: &str,
        document_id: &str,
    ) -> BridgeResult<()> {
        let event = DocumentChange {
            database_id: database_id.to_owned(),
            document_id: document_id.to_owned(),
        };
        self.post(EventCategory::DocumentChange, PortMessage::Text(event.to_json()?))?;
        Ok(())
    }

    /// Posts a query change notification. The payload is the raw query
    /// identifier, not JSON.
    pub fn notify_query_change(&self, query_id: &str) -> BridgeResult<()> {
        self.post(
            EventCategory::QueryChange,
            PortMessage::Text(query_id.to_owned()),
        )?;
        Ok(())
    }

    /// Posts a replicator status event.
    pub fn notify_replicator_status(&self, event: &ReplicatorStatusEvent) -> BridgeResult<()> {
        self.post(
            EventCategory::ReplicatorStatus,
            PortMessage::Text(event.to_json()?),
        )?;
        Ok(())
    }

    /// Blocks the calling thread until the consumer side renders a decision.
    ///
    /// `produce` is parked in the work table; its token is posted to the
    /// category's port. When the consumer invokes the trampoline with that
    /// token, `produce` runs on the consumer's thread, the result lands in
    /// the pending decision, and this call returns it.
    ///
    /// On transmit failure or timeout the token is cancelled first, so a
    /// late trampoline call cannot touch the abandoned decision. If the
    /// trampoline has already claimed the token when the timeout fires,
    /// this call keeps blocking until `produce` finishes and discards the
    /// late result: the caller's borrowed inputs are never released while
    /// the closure is still running on the consumer thread.
    pub fn request_decision<T, F>(&self, category: EventCategory, produce: F) -> BridgeResult<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let decision = Arc::new(PendingDecision::new());
        let completer = Arc::clone(&decision);
        let token = self.work.submit(WorkUnit::new(move || {
            let value = produce();
            if !completer.complete(value) {
                tracing::warn!("decision completed twice; extra result discarded");
            }
        }));

        if let Err(err) = self.post(category, PortMessage::WorkToken(token)) {
            self.work.cancel(token);
            return Err(err);
        }

        let timeout = self.config.read().decision_timeout;
        match decision.wait(timeout) {
            Ok(value) => Ok(value),
            Err(err) => {
                if !self.work.cancel(token) {
                    // The trampoline already claimed the token: the closure
                    // is running (or about to run) with borrowed inputs.
                    // Wait for it to complete before resuming the caller.
                    let _late = decision.wait(None);
                    tracing::warn!(token, "late decision after timeout discarded");
                }
                Err(err)
            }
        }
    }

    /// Runs the work unit named by `token` on the calling (consumer) thread.
    ///
    /// Unknown or already-executed tokens are a no-op.
    pub fn execute_work(&self, token: u64) -> bool {
        self.work.execute(token)
    }

    /// Number of decisions currently awaiting an answer.
    pub fn pending_work(&self) -> usize {
        self.work.len()
    }
}
