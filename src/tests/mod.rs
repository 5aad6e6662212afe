//! Cross-module tests: threaded scenarios and invariant properties.

use crate::sched::Parker;
use alloc::vec::Vec;
use portable_atomic::{AtomicU32, Ordering};

#[cfg(feature = "std-shim")]
mod scenarios;

/// Single-threaded parker whose "calling thread" is set by the test.
/// Suspension returns immediately; resumes are recorded.
pub(crate) struct ScriptedParker {
    caller: AtomicU32,
    resumed: spin::Mutex<Vec<u32>>,
}

impl ScriptedParker {
    pub(crate) fn new() -> Self {
        Self {
            caller: AtomicU32::new(0),
            resumed: spin::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn act_as(&self, who: u32) {
        self.caller.store(who, Ordering::SeqCst);
    }

    /// Number of resumes issued so far.
    pub(crate) fn resumes(&self) -> u32 {
        self.resumed.lock().len() as u32
    }

    /// Drain the resume targets recorded so far.
    pub(crate) fn take_resumed(&self) -> Vec<u32> {
        core::mem::take(&mut *self.resumed.lock())
    }
}

impl Parker for ScriptedParker {
    type Handle = u32;

    fn current(&self) -> u32 {
        self.caller.load(Ordering::SeqCst)
    }

    fn suspend_self(&self, _me: &u32) {}

    fn resume(&self, target: &u32) {
        self.resumed.lock().push(*target);
    }
}
