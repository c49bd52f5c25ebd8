//! The pending-decision primitive bridging a blocked engine thread and an
//! asynchronous answer from the consumer side.
//!
//! One producer (the consumer, via the work trampoline), one consumer (the
//! blocked engine thread), never reused. The result is written exactly once,
//! strictly before the condition variable is signalled, and taken exactly
//! once after the waiter confirms completion.

use crate::error::{BridgeError, BridgeResult};
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

struct Slot<T> {
    value: Option<T>,
    completed: bool,
}

/// A transient record pairing a result slot with a condition variable.
pub struct PendingDecision<T> {
    slot: Mutex<Slot<T>>,
    cv: Condvar,
}

impl<T> PendingDecision<T> {
    /// Creates an empty pending decision.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                value: None,
                completed: false,
            }),
            cv: Condvar::new(),
        }
    }

    /// Delivers the decision and wakes the waiter.
    ///
    /// Returns `false` (discarding `value`) if a decision was already
    /// delivered; a waiter is never signalled twice.
    pub fn complete(&self, value: T) -> bool {
        let mut slot = self.slot.lock();
        if slot.completed {
            return false;
        }
        slot.value = Some(value);
        slot.completed = true;
        drop(slot);
        self.cv.notify_one();
        true
    }

    /// Returns whether a decision has been delivered.
    pub fn is_completed(&self) -> bool {
        self.slot.lock().completed
    }

    /// Blocks the calling thread until the decision arrives.
    ///
    /// `timeout: None` waits forever. Spurious wakeups re-check the
    /// completion flag and keep waiting.
    pub fn wait(&self, timeout: Option<Duration>) -> BridgeResult<T> {
        let mut slot = self.slot.lock();
        match timeout {
            None => loop {
                if let Some(value) = slot.value.take() {
                    return Ok(value);
                }
                self.cv.wait(&mut slot);
            },
            Some(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    if let Some(value) = slot.value.take() {
                        return Ok(value);
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(BridgeError::DecisionTimeout { waited: limit });
                    }
                    self.cv.wait_for(&mut slot, deadline - now);
                }
            }
        }
    }
}

impl<T> Default for PendingDecision<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn complete_before_wait() {
        let decision = PendingDecision::new();
        assert!(decision.complete(42));
        assert_eq!(decision.wait(None).unwrap(), 42);
    }

    #[test]
    fn wait_blocks_until_complete() {
        let decision = Arc::new(PendingDecision::new());
        let producer = Arc::clone(&decision);

        let start = Instant::now();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            assert!(producer.complete(true));
        });

        let value = decision.wait(Some(Duration::from_secs(5))).unwrap();
        assert!(value);
        assert!(start.elapsed() >= Duration::from_millis(10));
        handle.join().unwrap();
    }

    #[test]
    fn double_complete_is_rejected() {
        let decision = PendingDecision::new();
        assert!(decision.complete("first"));
        assert!(!decision.complete("second"));
        assert_eq!(decision.wait(None).unwrap(), "first");
    }

    #[test]
    fn timeout_expires() {
        let decision: PendingDecision<bool> = PendingDecision::new();
        let start = Instant::now();
        let err = decision.wait(Some(Duration::from_millis(20))).unwrap_err();
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(matches!(err, BridgeError::DecisionTimeout { .. }));
    }

    #[test]
    fn completion_flag_observable() {
        let decision = PendingDecision::new();
        assert!(!decision.is_completed());
        decision.complete(());
        assert!(decision.is_completed());
    }

    #[test]
    fn independent_decisions_do_not_share_state() {
        let a = Arc::new(PendingDecision::new());
        let b = Arc::new(PendingDecision::new());

        let producer_a = Arc::clone(&a);
        let producer_b = Arc::clone(&b);
        let handle = thread::spawn(move || {
            producer_b.complete(2);
            thread::sleep(Duration::from_millis(5));
            producer_a.complete(1);
        });

        assert_eq!(b.wait(Some(Duration::from_secs(1))).unwrap(), 2);
        assert_eq!(a.wait(Some(Duration::from_secs(1))).unwrap(), 1);
        handle.join().unwrap();
    }
}
