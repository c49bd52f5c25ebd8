//! Deferred work units and the table behind the execution trampoline.
//!
//! A decision hook parks its wake-up closure here and posts the token across
//! the boundary. The consumer hands the token back through the trampoline,
//! which runs the closure exactly once on the consumer's thread. Tokens are
//! removed on execution and on cancellation, so a late or repeated
//! trampoline call can only hit a logged no-op, never freed state.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An owned, run-at-most-once unit of deferred work.
pub struct WorkUnit {
    task: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl WorkUnit {
    /// Wraps a closure as a work unit.
    pub fn new(task: impl FnOnce() + Send + 'static) -> Self {
        Self {
            task: Mutex::new(Some(Box::new(task))),
        }
    }

    /// Runs the closure if it has not run yet.
    ///
    /// Returns `false` if the unit already ran.
    pub fn run(&self) -> bool {
        let task = self.task.lock().take();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

/// Table of outstanding work units, keyed by token.
pub struct WorkTable {
    entries: Mutex<HashMap<u64, Arc<WorkUnit>>>,
    next_token: AtomicU64,
}

impl WorkTable {
    /// Creates an empty table. Tokens start at 1; 0 is never issued.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Registers a work unit and returns its token.
    pub fn submit(&self, work: WorkUnit) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().insert(token, Arc::new(work));
        token
    }

    /// Removes and runs the unit named by `token`.
    ///
    /// Unknown tokens (never issued, already executed, or cancelled) are a
    /// logged no-op.
    pub fn execute(&self, token: u64) -> bool {
        let unit = self.entries.lock().remove(&token);
        match unit {
            Some(unit) => unit.run(),
            None => {
                tracing::debug!(token, "no pending work for token");
                false
            }
        }
    }

    /// Removes a unit without running it. Used by the timeout path.
    pub fn cancel(&self, token: u64) -> bool {
        self.entries.lock().remove(&token).is_some()
    }

    /// Number of outstanding units.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if no units are outstanding.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for WorkTable {
    fn default() -> Self {
        Self::new()
    }
}
