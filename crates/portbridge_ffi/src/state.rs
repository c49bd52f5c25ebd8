//! Process-wide bridge state behind the C entry points.

use crate::types::{
    PortBridgeConflictCallback, PortBridgeFilterCallback, PortBridgeMessage,
    PortBridgeMessageKind, PortBridgePostMessageFn, PortBridgeStatusCallback,
};
use parking_lot::RwLock;
use portbridge_core::{Bridge, BridgeConfig, PortId, PortMessage, PortTransmitter};
use std::ffi::CString;
use std::ptr;
use std::sync::{Arc, OnceLock};

/// Callbacks registered alongside the ports.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RegisteredCallbacks {
    pub status: Option<PortBridgeStatusCallback>,
    pub filter: Option<PortBridgeFilterCallback>,
    pub conflict: Option<PortBridgeConflictCallback>,
}

static POST_FN: RwLock<Option<PortBridgePostMessageFn>> = RwLock::new(None);
static CALLBACKS: RwLock<RegisteredCallbacks> = RwLock::new(RegisteredCallbacks {
    status: None,
    filter: None,
    conflict: None,
});
static BRIDGE: OnceLock<Bridge> = OnceLock::new();

/// Posts through the host function pointer installed at startup.
struct HostTransmitter;

impl PortTransmitter for HostTransmitter {
    fn post(&self, port: PortId, message: &PortMessage) -> bool {
        let Some(post) = *POST_FN.read() else {
            tracing::warn!("no post-message function installed; message dropped");
            return false;
        };
        match message {
            PortMessage::Text(text) => {
                let Ok(text) = CString::new(text.as_str()) else {
                    tracing::warn!("payload contained interior NUL; message dropped");
                    return false;
                };
                let message = PortBridgeMessage {
                    kind: PortBridgeMessageKind::Text,
                    text: text.as_ptr(),
                    work_token: 0,
                };
                // The CString outlives the call; the host copies the bytes.
                unsafe { post(port.as_u64(), &message) }
            }
            PortMessage::WorkToken(token) => {
                let message = PortBridgeMessage {
                    kind: PortBridgeMessageKind::WorkToken,
                    text: ptr::null(),
                    work_token: *token,
                };
                unsafe { post(port.as_u64(), &message) }
            }
        }
    }
}

/// The process-wide bridge instance, created on first use.
pub(crate) fn bridge() -> &'static Bridge {
    BRIDGE.get_or_init(|| Bridge::new(BridgeConfig::default(), Arc::new(HostTransmitter)))
}

pub(crate) fn set_post_fn(post: Option<PortBridgePostMessageFn>) {
    *POST_FN.write() = post;
}

pub(crate) fn set_callbacks(callbacks: RegisteredCallbacks) {
    *CALLBACKS.write() = callbacks;
}

pub(crate) fn callbacks() -> RegisteredCallbacks {
    *CALLBACKS.read()
}
