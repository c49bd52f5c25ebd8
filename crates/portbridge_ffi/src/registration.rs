//! Registration and setup entry points.

use crate::state::{bridge, set_callbacks, set_post_fn, RegisteredCallbacks};
use crate::types::{
    PortBridgeConflictCallback, PortBridgeFilterCallback, PortBridgePostMessageFn,
    PortBridgeStatusCallback,
};
use portbridge_core::{PortBindings, PortId};
use std::time::Duration;

fn port(raw: u64) -> Option<PortId> {
    (raw != 0).then(|| PortId(raw))
}

/// Installs the host's post-message function.
///
/// Must be called before any listener can deliver events. Passing `None`
/// uninstalls it; subsequent events are dropped.
#[no_mangle]
pub extern "C" fn portbridge_set_post_message(post: Option<PortBridgePostMessageFn>) {
    set_post_fn(post);
}

/// Registers the six category ports and the three decision callbacks.
///
/// Replaces all previous bindings atomically; an in-flight listener sees
/// either the old or the new bindings, never a mix. A port handle of 0
/// leaves that category unbound and its events are dropped.
// The parameter list is the registration contract with the host.
#[allow(clippy::too_many_arguments)]
#[no_mangle]
pub extern "C" fn portbridge_register_ports(
    database_change_port: u64,
    document_change_port: u64,
    query_change_port: u64,
    replicator_status_port: u64,
    replicator_filter_port: u64,
    conflict_resolution_port: u64,
    status_callback: Option<PortBridgeStatusCallback>,
    filter_callback: Option<PortBridgeFilterCallback>,
    conflict_callback: Option<PortBridgeConflictCallback>,
) {
    bridge().register_ports(PortBindings {
        database_change: port(database_change_port),
        document_change: port(document_change_port),
        query_change: port(query_change_port),
        replicator_status: port(replicator_status_port),
        replicator_filter: port(replicator_filter_port),
        conflict_resolution: port(conflict_resolution_port),
    });
    set_callbacks(RegisteredCallbacks {
        status: status_callback,
        filter: filter_callback,
        conflict: conflict_callback,
    });
    tracing::debug!("ports registered");
}

/// Sets the upper bound, in milliseconds, on how long a filter or conflict
/// hook blocks the engine thread waiting for the host.
///
/// 0 waits forever (the engine API's original synchronous contract).
#[no_mangle]
pub extern "C" fn portbridge_set_decision_timeout(millis: u64) {
    let timeout = (millis != 0).then(|| Duration::from_millis(millis));
    bridge().set_decision_timeout(timeout);
}

/// Sets the boolean a replication filter returns when its decision fails
/// or times out.
///
/// Defaults to `true`: the document replicates as if no filter were
/// installed, which never loses data.
#[no_mangle]
pub extern "C" fn portbridge_set_filter_fallback(fallback: bool) {
    bridge().set_filter_fallback(fallback);
}

/// Installs a process-wide log subscriber reading `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
#[no_mangle]
pub extern "C" fn portbridge_init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Returns the library version as a null-terminated string.
///
/// The returned pointer is static and should not be freed.
#[no_mangle]
pub extern "C" fn portbridge_version() -> *const std::ffi::c_char {
    static VERSION: &[u8] = b"0.2.0\0";
    VERSION.as_ptr() as *const std::ffi::c_char
}
