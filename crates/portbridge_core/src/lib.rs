//! # PortBridge Core
//!
//! Bridge logic for exposing an embedded database engine's change
//! notifications and replication callbacks to a managed-runtime host over
//! that host's message-port facility.
//!
//! This crate provides:
//! - Port registry (category → endpoint, atomic snapshot swap)
//! - Structured event values with fixed JSON schemas
//! - Fire-and-forget event posting (at-most-once, best effort)
//! - Synchronous decision bridge (blocking an engine thread until the
//!   consumer side answers through the work trampoline)
//! - Work table for run-at-most-once deferred units
//!
//! ## Key invariants
//!
//! - A pending decision's result is written exactly once, strictly before
//!   the waiter is signalled, and read exactly once after waking
//! - Events within a category are delivered in the order they were fired
//! - Executing a work token twice never double-signals a waiter
//! - Registration replaces all port bindings atomically
//!
//! The engine, replicator, and host message ports are external. Nothing in
//! this crate allocates beyond the lifetime of a single event or decision.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod bridge;
mod config;
mod decision;
mod error;
mod event;
mod registry;
mod transmit;
mod work;

pub use bridge::Bridge;
pub use config::{BridgeConfig, DEFAULT_DECISION_TIMEOUT};
pub use decision::PendingDecision;
pub use error::{BridgeError, BridgeResult};
pub use event::{
    DatabaseChange, DocumentChange, ReplicatorActivity, ReplicatorErrorInfo, ReplicatorProgress,
    ReplicatorStatusEvent,
};
pub use registry::{EventCategory, PortBindings, PortId, PortRegistry};
pub use transmit::{MockTransmitter, PortMessage, PortTransmitter};
pub use work::{WorkTable, WorkUnit};
