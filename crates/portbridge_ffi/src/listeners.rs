//! Fire-and-forget listener entry points.
//!
//! The engine invokes these on its own internal threads. Every pointer is
//! borrowed and valid only for the call; each listener builds an owned
//! event, posts it, and returns. Delivery is at-most-once: serialization or
//! transmit failures drop the event with a log record.

use crate::state::{bridge, callbacks};
use crate::types::{
    PortBridgeDatabase, PortBridgeQuery, PortBridgeReplicator, PortBridgeReplicatorStatus,
};
use portbridge_core::{
    ReplicatorActivity, ReplicatorErrorInfo, ReplicatorProgress, ReplicatorStatusEvent,
};
use std::ffi::{c_char, c_uint, CStr};

/// Borrows a C string for the duration of the call.
///
/// # Safety
///
/// `ptr` must be null or a valid null-terminated string.
pub(crate) unsafe fn borrowed_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Engine hook for database-level changes.
///
/// # Safety
///
/// - `context` must be a valid null-terminated UTF-8 database identifier
/// - `doc_ids` must point to `num_docs` valid null-terminated strings, or
///   be null when `num_docs` is 0
/// - All pointers are borrowed for the duration of the call only
#[no_mangle]
pub unsafe extern "C" fn portbridge_database_change_listener(
    context: *const c_char,
    _db: *const PortBridgeDatabase,
    num_docs: c_uint,
    doc_ids: *const *const c_char,
) {
    let Some(database_id) = borrowed_str(context) else {
        tracing::warn!("database change with invalid database id; dropped");
        return;
    };

    let mut ids = Vec::with_capacity(num_docs as usize);
    if !doc_ids.is_null() {
        for idx in 0..num_docs as usize {
            match borrowed_str(*doc_ids.add(idx)) {
                Some(id) => ids.push(id.to_owned()),
                None => {
                    tracing::warn!(index = idx, "document id null or not UTF-8; skipped")
                }
            }
        }
    }

    if let Err(err) = bridge().notify_database_change(database_id, ids) {
        tracing::warn!(%err, "database change event dropped");
    }
}

/// Engine hook for single-document changes.
///
/// # Safety
///
/// `context` and `doc_id` must be valid null-terminated UTF-8 strings,
/// borrowed for the duration of the call only.
#[no_mangle]
pub unsafe extern "C" fn portbridge_document_change_listener(
    context: *const c_char,
    _db: *const PortBridgeDatabase,
    doc_id: *const c_char,
) {
    let (Some(database_id), Some(document_id)) = (borrowed_str(context), borrowed_str(doc_id))
    else {
        tracing::warn!("document change with invalid identifiers; dropped");
        return;
    };

    if let Err(err) = bridge().notify_document_change(database_id, document_id) {
        tracing::warn!(%err, "document change event dropped");
    }
}

/// Engine hook for query result-set changes.
///
/// The payload is the raw query identifier.
///
/// # Safety
///
/// `query_id` must be a valid null-terminated UTF-8 string, borrowed for
/// the duration of the call only.
#[no_mangle]
pub unsafe extern "C" fn portbridge_query_change_listener(
    query_id: *const c_char,
    _query: *mut PortBridgeQuery,
) {
    let Some(query_id) = borrowed_str(query_id) else {
        tracing::warn!("query change with invalid query id; dropped");
        return;
    };

    if let Err(err) = bridge().notify_query_change(query_id) {
        tracing::warn!(%err, "query change event dropped");
    }
}

/// Engine hook for replicator status updates.
///
/// Invokes the registered status callback synchronously (if any), then
/// posts the JSON payload to the status port. The error object is always
/// present in the payload; the no-error case is all-zero fields.
///
/// # Safety
///
/// - `id` must be a valid null-terminated UTF-8 replicator identifier
/// - `status` must point to a valid status snapshot; its `error.message`
///   must be null or a valid null-terminated string
/// - All pointers are borrowed for the duration of the call only
#[no_mangle]
pub unsafe extern "C" fn portbridge_replicator_change_listener(
    id: *const c_char,
    _repl: *const PortBridgeReplicator,
    status: *const PortBridgeReplicatorStatus,
) {
    let Some(replicator_id) = borrowed_str(id) else {
        tracing::warn!("replicator status with invalid id; dropped");
        return;
    };
    if status.is_null() {
        tracing::warn!("replicator status with null snapshot; dropped");
        return;
    }

    if let Some(status_callback) = callbacks().status {
        status_callback(id, status);
    }

    let status = &*status;
    let error = ReplicatorErrorInfo {
        code: status.error.code,
        domain: status.error.domain,
        internal_info: status.error.internal_info,
        message: borrowed_str(status.error.message).unwrap_or("").to_owned(),
    };
    let event = ReplicatorStatusEvent::new(
        replicator_id,
        ReplicatorActivity::from_code(status.activity),
        ReplicatorProgress {
            document_count: status.progress.document_count,
            fraction_complete: status.progress.fraction_complete,
        },
        error,
    );

    if let Err(err) = bridge().notify_replicator_status(&event) {
        tracing::warn!(%err, "replicator status event dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{install_capture, take_captured, Captured, TEST_LOCK};
    use crate::types::{PortBridgeErrorInfo, PortBridgeProgress};
    use serde_json::{json, Value};
    use std::ffi::CString;
    use std::ptr;

    #[test]
    fn database_change_builds_schema_payload() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        let db_id = CString::new("db1").unwrap();
        let doc_a = CString::new("a").unwrap();
        let doc_b = CString::new("b").unwrap();
        let doc_ids = [doc_a.as_ptr(), doc_b.as_ptr()];

        unsafe {
            portbridge_database_change_listener(db_id.as_ptr(), ptr::null(), 2, doc_ids.as_ptr());
        }

        let captured = take_captured();
        assert_eq!(captured.len(), 1);
        let (port, Captured::Text(payload)) = &captured[0] else {
            panic!("expected text payload");
        };
        assert_eq!(*port, 1);
        let value: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value, json!({"databaseId": "db1", "docIDs": ["a", "b"]}));
    }

    #[test]
    fn database_change_zero_docs_has_empty_array() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        let db_id = CString::new("db1").unwrap();
        unsafe {
            portbridge_database_change_listener(db_id.as_ptr(), ptr::null(), 0, ptr::null());
        }

        let captured = take_captured();
        let (_, Captured::Text(payload)) = &captured[0] else {
            panic!("expected text payload");
        };
        let value: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["docIDs"], json!([]));
    }

    #[test]
    fn database_change_skips_invalid_doc_ids() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        let db_id = CString::new("db1").unwrap();
        let doc_a = CString::new("a").unwrap();
        let doc_b = CString::new("b").unwrap();
        // Invalid UTF-8 and a null entry in the middle of the array.
        let bad = [0xffu8, 0xfe, 0x00];
        let doc_ids = [
            doc_a.as_ptr(),
            ptr::null(),
            bad.as_ptr() as *const std::ffi::c_char,
            doc_b.as_ptr(),
        ];

        unsafe {
            portbridge_database_change_listener(db_id.as_ptr(), ptr::null(), 4, doc_ids.as_ptr());
        }

        // The event is still delivered, carrying the parseable IDs.
        let captured = take_captured();
        let (_, Captured::Text(payload)) = &captured[0] else {
            panic!("expected text payload");
        };
        let value: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["docIDs"], json!(["a", "b"]));
    }

    #[test]
    fn document_change_payload() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        let db_id = CString::new("db1").unwrap();
        let doc_id = CString::new("doc-7").unwrap();
        unsafe {
            portbridge_document_change_listener(db_id.as_ptr(), ptr::null(), doc_id.as_ptr());
        }

        let captured = take_captured();
        let (port, Captured::Text(payload)) = &captured[0] else {
            panic!("expected text payload");
        };
        assert_eq!(*port, 2);
        let value: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value, json!({"databaseId": "db1", "documentId": "doc-7"}));
    }

    #[test]
    fn query_change_posts_raw_identifier() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        let query_id = CString::new("live-query-3").unwrap();
        unsafe {
            portbridge_query_change_listener(query_id.as_ptr(), ptr::null_mut());
        }

        let captured = take_captured();
        assert_eq!(captured[0], (3, Captured::Text("live-query-3".into())));
    }

    #[test]
    fn null_identifiers_drop_the_event() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        unsafe {
            portbridge_database_change_listener(ptr::null(), ptr::null(), 0, ptr::null());
            portbridge_document_change_listener(ptr::null(), ptr::null(), ptr::null());
            portbridge_query_change_listener(ptr::null(), ptr::null_mut());
            portbridge_replicator_change_listener(ptr::null(), ptr::null(), ptr::null());
        }

        assert!(take_captured().is_empty());
    }

    #[test]
    fn replicator_status_no_error_is_zeroed() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        let id = CString::new("r1").unwrap();
        let status = PortBridgeReplicatorStatus {
            activity: 3,
            progress: PortBridgeProgress {
                document_count: 12,
                fraction_complete: 1.0,
            },
            error: PortBridgeErrorInfo {
                code: 0,
                domain: 0,
                internal_info: 0,
                message: ptr::null(),
            },
        };

        unsafe {
            portbridge_replicator_change_listener(id.as_ptr(), ptr::null(), &status);
        }

        let captured = take_captured();
        let (port, Captured::Text(payload)) = &captured[0] else {
            panic!("expected text payload");
        };
        assert_eq!(*port, 4);
        let value: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["id"], "r1");
        assert_eq!(value["activity"], 3);
        assert_eq!(
            value["error"],
            json!({"code": 0, "domain": 0, "internal_info": 0, "message": ""})
        );
    }

    #[test]
    fn replicator_status_with_error_message() {
        let _guard = TEST_LOCK.lock();
        install_capture();

        let id = CString::new("r1").unwrap();
        let message = CString::new("socket closed").unwrap();
        let status = PortBridgeReplicatorStatus {
            activity: 1,
            progress: PortBridgeProgress {
                document_count: 0,
                fraction_complete: 0.0,
            },
            error: PortBridgeErrorInfo {
                code: 1001,
                domain: 2,
                internal_info: 5,
                message: message.as_ptr(),
            },
        };

        unsafe {
            portbridge_replicator_change_listener(id.as_ptr(), ptr::null(), &status);
        }

        let captured = take_captured();
        let (_, Captured::Text(payload)) = &captured[0] else {
            panic!("expected text payload");
        };
        let value: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(value["error"]["code"], 1001);
        assert_eq!(value["error"]["message"], "socket closed");
    }
}
