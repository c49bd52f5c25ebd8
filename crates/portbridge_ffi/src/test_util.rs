//! Shared fixtures for FFI tests.
//!
//! The C entry points go through process-wide state, so tests serialize on
//! [`TEST_LOCK`] and install a capturing post function that copies payloads
//! out before the borrowed message expires.

use crate::registration::{
    portbridge_register_ports, portbridge_set_decision_timeout, portbridge_set_filter_fallback,
    portbridge_set_post_message,
};
use crate::replicator::portbridge_execute_work;
use crate::types::{PortBridgeMessage, PortBridgeMessageKind};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::ffi::CStr;
use std::thread;
use std::time::{Duration, Instant};

/// Serializes tests that touch the process-wide bridge state.
pub(crate) static TEST_LOCK: Mutex<()> = Mutex::new(());

/// A copied-out message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Captured {
    Text(String),
    WorkToken(u64),
}

static CAPTURED: Mutex<Vec<(u64, Captured)>> = Mutex::new(Vec::new());

unsafe extern "C" fn capture_post(port: u64, message: *const PortBridgeMessage) -> bool {
    let message = &*message;
    let captured = match message.kind {
        PortBridgeMessageKind::Text => {
            Captured::Text(CStr::from_ptr(message.text).to_string_lossy().into_owned())
        }
        PortBridgeMessageKind::WorkToken => Captured::WorkToken(message.work_token),
    };
    CAPTURED.lock().push((port, captured));
    true
}

/// Installs the capturing post function, binds ports 1..=6 with no
/// callbacks, and resets the decision timeout.
pub(crate) fn install_capture() {
    CAPTURED.lock().clear();
    portbridge_set_post_message(Some(capture_post));
    portbridge_register_ports(1, 2, 3, 4, 5, 6, None, None, None);
    portbridge_set_decision_timeout(30_000);
    portbridge_set_filter_fallback(true);
}

/// Drains and returns everything captured so far, in post order.
pub(crate) fn take_captured() -> Vec<(u64, Captured)> {
    std::mem::take(&mut *CAPTURED.lock())
}

/// Spawns a consumer thread that executes `count` distinct work tokens as
/// they appear, waiting `delay` before answering each.
pub(crate) fn spawn_consumer(count: usize, delay: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut seen = HashSet::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while seen.len() < count && Instant::now() < deadline {
            let tokens: Vec<u64> = CAPTURED
                .lock()
                .iter()
                .filter_map(|(_, captured)| match captured {
                    Captured::WorkToken(token) => Some(*token),
                    _ => None,
                })
                .collect();
            for token in tokens {
                if seen.insert(token) {
                    thread::sleep(delay);
                    portbridge_execute_work(token);
                }
            }
            thread::sleep(Duration::from_millis(1));
        }
    })
}
