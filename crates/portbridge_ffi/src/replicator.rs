//! Blocking decision hooks and the work-execution trampoline.
//!
//! The engine invokes the filter and resolver hooks synchronously and the
//! borrowed document pointers are only valid for the call, so the calling
//! engine thread must block until the host answers. The closure that wakes
//! it is parked in the bridge's work table; the host receives the token on
//! the category's port and hands it back through
//! [`portbridge_execute_work`].

use crate::listeners::borrowed_str;
use crate::state::{bridge, callbacks};
use crate::types::{PortBridgeDocument, PortBridgeFilterDirection};
use portbridge_core::EventCategory;
use std::ffi::c_char;

/// A borrowed pointer captured by a decision closure.
///
/// Valid for the whole decision: the engine thread that owns the pointee
/// stays blocked until the closure has run or the unclaimed token is
/// cancelled. A timed-out decision whose closure is already running keeps
/// the engine thread blocked until the closure finishes.
struct BorrowedPtr<T>(*const T);

unsafe impl<T> Send for BorrowedPtr<T> {}

unsafe fn replication_filter(
    direction: PortBridgeFilterDirection,
    context: *const c_char,
    document: *const PortBridgeDocument,
    is_deleted: bool,
) -> bool {
    let fallback = bridge().config().filter_fallback;
    let Some(filter_callback) = callbacks().filter else {
        tracing::warn!("no filter callback registered; using fallback");
        return fallback;
    };

    let context = BorrowedPtr(context);
    let document = BorrowedPtr(document);
    let result = bridge().request_decision(EventCategory::ReplicatorFilter, move || {
        // Rebind so the closure captures the Send wrappers, not the raw
        // pointer fields (edition-2021 disjoint capture).
        let context = context;
        let document = document;
        unsafe { filter_callback(direction, context.0, document.0, is_deleted) }
    });

    match result {
        Ok(decision) => decision,
        Err(err) => {
            tracing::error!(%err, ?direction, "filter decision failed; using fallback");
            fallback
        }
    }
}

/// Engine hook deciding whether a document is pushed to the target.
///
/// Blocks the calling engine thread until the host answers or the decision
/// timeout expires, then returns the host's boolean (or the configured
/// fallback on timeout).
///
/// # Safety
///
/// `context` must be null or a valid null-terminated string; `document` is
/// borrowed and stays valid while this call blocks.
#[no_mangle]
pub unsafe extern "C" fn portbridge_push_replication_filter(
    context: *const c_char,
    document: *const PortBridgeDocument,
    is_deleted: bool,
) -> bool {
    replication_filter(
        PortBridgeFilterDirection::Push,
        context,
        document,
        is_deleted,
    )
}

/// Engine hook deciding whether a document is pulled from the target.
///
/// # Safety
///
/// Same contract as [`portbridge_push_replication_filter`].
#[no_mangle]
pub unsafe extern "C" fn portbridge_pull_replication_filter(
    context: *const c_char,
    document: *const PortBridgeDocument,
    is_deleted: bool,
) -> bool {
    replication_filter(
        PortBridgeFilterDirection::Pull,
        context,
        document,
        is_deleted,
    )
}

/// Engine hook resolving a replication conflict.
///
/// Blocks the calling engine thread until the host supplies the resolved
/// document. Null is a valid resolution and means "delete". If the decision
/// fails (timeout, no port, no callback), the local document is returned so
/// the local revision is kept.
///
/// # Safety
///
/// All pointers are borrowed and stay valid while this call blocks. The
/// returned pointer is one the host's callback produced (or `local`).
#[no_mangle]
pub unsafe extern "C" fn portbridge_conflict_resolver(
    context: *const c_char,
    document_id: *const c_char,
    local: *const PortBridgeDocument,
    remote: *const PortBridgeDocument,
) -> *const PortBridgeDocument {
    let Some(conflict_callback) = callbacks().conflict else {
        tracing::warn!("no conflict callback registered; keeping local revision");
        return local;
    };

    let document_id_str = borrowed_str(document_id).unwrap_or("");
    tracing::debug!(document_id = document_id_str, "conflict decision requested");

    let context = BorrowedPtr(context);
    let document_id = BorrowedPtr(document_id);
    let local_doc = BorrowedPtr(local);
    let remote_doc = BorrowedPtr(remote);
    let result = bridge().request_decision(EventCategory::ConflictResolution, move || {
        // Rebind so the closure captures the Send wrappers, not the raw
        // pointer fields (edition-2021 disjoint capture).
        let context = context;
        let document_id = document_id;
        let local_doc = local_doc;
        let remote_doc = remote_doc;
        unsafe {
            BorrowedPtr(conflict_callback(
                context.0,
                document_id.0,
                local_doc.0,
                remote_doc.0,
            ))
        }
    });

    match result {
        Ok(resolved) => resolved.0,
        Err(err) => {
            tracing::error!(%err, "conflict decision failed; keeping local revision");
            local
        }
    }
}

/// Runs a previously posted unit of work on the calling (host) thread.
///
/// Executing the same token twice, or a token whose decision already timed
/// out, is a no-op.
#[no_mangle]
pub extern "C" fn portbridge_execute_work(token: u64) {
    bridge().execute_work(token);
}
