//! Port registry mapping event categories to messaging endpoints.
//!
//! The host registers one port per category at startup. Listeners read the
//! current snapshot on every invocation. Registration replaces the whole
//! snapshot atomically, so an in-flight listener sees either the old or the
//! new bindings, never a mix.

use parking_lot::RwLock;
use std::sync::Arc;

/// An opaque 64-bit handle naming a messaging-boundary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId(pub u64);

impl PortId {
    /// Returns the raw handle value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Logical event categories, one registered port each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Database-level change (set of changed document IDs).
    DatabaseChange,
    /// Single-document change.
    DocumentChange,
    /// Query result-set change.
    QueryChange,
    /// Replicator activity/progress/error updates.
    ReplicatorStatus,
    /// Push/pull filter decision requests.
    ReplicatorFilter,
    /// Conflict-resolution decision requests.
    ConflictResolution,
}

/// An immutable set of port bindings, one optional endpoint per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortBindings {
    /// Endpoint for database change events.
    pub database_change: Option<PortId>,
    /// Endpoint for document change events.
    pub document_change: Option<PortId>,
    /// Endpoint for query change events.
    pub query_change: Option<PortId>,
    /// Endpoint for replicator status events.
    pub replicator_status: Option<PortId>,
    /// Endpoint for replication filter decision requests.
    pub replicator_filter: Option<PortId>,
    /// Endpoint for conflict-resolution decision requests.
    pub conflict_resolution: Option<PortId>,
}

impl PortBindings {
    /// Returns the endpoint bound to a category, if any.
    pub fn port(&self, category: EventCategory) -> Option<PortId> {
        match category {
            EventCategory::DatabaseChange => self.database_change,
            EventCategory::DocumentChange => self.document_change,
            EventCategory::QueryChange => self.query_change,
            EventCategory::ReplicatorStatus => self.replicator_status,
            EventCategory::ReplicatorFilter => self.replicator_filter,
            EventCategory::ConflictResolution => self.conflict_resolution,
        }
    }
}

/// Process-wide table of port bindings.
///
/// Reads clone an `Arc` snapshot; registration swaps the snapshot wholesale.
/// No partial registration is ever observable.
pub struct PortRegistry {
    snapshot: RwLock<Arc<PortBindings>>,
}

impl PortRegistry {
    /// Creates an empty registry (no category bound).
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(PortBindings::default())),
        }
    }

    /// Replaces all bindings atomically.
    pub fn register(&self, bindings: PortBindings) {
        *self.snapshot.write() = Arc::new(bindings);
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<PortBindings> {
        Arc::clone(&self.snapshot.read())
    }

    /// Returns the endpoint currently bound to a category.
    pub fn port(&self, category: EventCategory) -> Option<PortId> {
        self.snapshot.read().port(category)
    }
}

impl Default for PortRegistry {
    fn default() -> Self {
        Self::new()
    }
}
