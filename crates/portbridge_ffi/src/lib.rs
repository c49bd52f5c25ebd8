//! # PortBridge FFI
//!
//! Stable C ABI for the PortBridge native-port bindings.
//!
//! This crate provides:
//! - The registration entry point binding event categories to host ports
//! - Listener entry points the engine invokes on its own threads
//! - Push/pull filter and conflict-resolver hooks that block the engine
//!   thread until the host answers
//! - The work-execution trampoline the host calls back into
//! - Installers for the host's post-message primitive and logging
//!
//! All engine pointers passed to listener entry points are borrowed and
//! valid only for the duration of the call; nothing here retains them.

#![warn(missing_docs)]

pub mod listeners;
pub mod registration;
pub mod replicator;
pub mod types;

mod state;

#[cfg(test)]
pub(crate) mod test_util;
