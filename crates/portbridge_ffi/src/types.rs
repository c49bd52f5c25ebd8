//! Type definitions for FFI.

use std::ffi::c_char;

/// An opaque engine database handle.
///
/// Owned by the engine. Never dereference or retain past the call.
#[repr(C)]
pub struct PortBridgeDatabase {
    _private: [u8; 0],
}

/// An opaque engine document handle.
#[repr(C)]
pub struct PortBridgeDocument {
    _private: [u8; 0],
}

/// An opaque engine query handle.
#[repr(C)]
pub struct PortBridgeQuery {
    _private: [u8; 0],
}

/// An opaque engine replicator handle.
#[repr(C)]
pub struct PortBridgeReplicator {
    _private: [u8; 0],
}

/// Discriminator for [`PortBridgeMessage`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortBridgeMessageKind {
    /// `text` carries a null-terminated UTF-8 payload.
    Text = 0,
    /// `work_token` names a pending work unit for the trampoline.
    WorkToken = 1,
}

/// A message handed to the host's post primitive.
///
/// The `text` pointer is valid only for the duration of the post call; the
/// host must copy it before returning.
#[repr(C)]
pub struct PortBridgeMessage {
    /// Which field carries the payload.
    pub kind: PortBridgeMessageKind,
    /// Null-terminated UTF-8 payload when `kind` is `Text`, null otherwise.
    pub text: *const c_char,
    /// Work token when `kind` is `WorkToken`, 0 otherwise.
    pub work_token: u64,
}

/// Replication direction for filter decisions.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortBridgeFilterDirection {
    /// Pushing changes to the target.
    Push = 0,
    /// Pulling changes from the target.
    Pull = 1,
}

/// Replication progress counters, as reported by the engine.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PortBridgeProgress {
    /// Documents transferred so far.
    pub document_count: u64,
    /// Fraction of the total estimated work completed, 0.0 to 1.0.
    pub fraction_complete: f32,
}

/// Error triple attached to a replicator status, zeroed when no error.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PortBridgeErrorInfo {
    /// Engine error code, 0 when no error.
    pub code: i32,
    /// Engine error domain, 0 when no error.
    pub domain: i32,
    /// Platform-specific auxiliary code, 0 when no error.
    pub internal_info: i32,
    /// Formatted message from the engine, null when no error.
    pub message: *const c_char,
}

/// A replicator status snapshot, as passed by the engine.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PortBridgeReplicatorStatus {
    /// Activity level code (0 stopped .. 4 busy).
    pub activity: u8,
    /// Progress counters.
    pub progress: PortBridgeProgress,
    /// Error triple.
    pub error: PortBridgeErrorInfo,
}

/// The host's post-message primitive.
///
/// Returns whether the endpoint accepted the message.
pub type PortBridgePostMessageFn =
    unsafe extern "C" fn(port: u64, message: *const PortBridgeMessage) -> bool;

/// Host callback for synchronous replicator status delivery.
pub type PortBridgeStatusCallback =
    unsafe extern "C" fn(id: *const c_char, status: *const PortBridgeReplicatorStatus);

/// Host callback rendering a push/pull filter decision.
pub type PortBridgeFilterCallback = unsafe extern "C" fn(
    direction: PortBridgeFilterDirection,
    id: *const c_char,
    document: *const PortBridgeDocument,
    is_deleted: bool,
) -> bool;

/// Host callback resolving a replication conflict.
///
/// Returns the resolved document, or null to delete.
pub type PortBridgeConflictCallback = unsafe extern "C" fn(
    id: *const c_char,
    document_id: *const c_char,
    local: *const PortBridgeDocument,
    remote: *const PortBridgeDocument,
) -> *const PortBridgeDocument;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_kind_codes() {
        assert_eq!(PortBridgeMessageKind::Text as u8, 0);
        assert_eq!(PortBridgeMessageKind::WorkToken as u8, 1);
    }

    #[test]
    fn filter_direction_codes() {
        assert_eq!(PortBridgeFilterDirection::Push as u8, 0);
        assert_eq!(PortBridgeFilterDirection::Pull as u8, 1);
    }
}
