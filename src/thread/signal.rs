//! Single-slot wake signal for one host thread.

use super::ThreadState;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

/// A one-permit wake slot plus the owning thread's run state.
///
/// `notify` deposits the permit; `wait` consumes it, parking the owner until
/// it is present. A notify that lands before the wait is kept, and a permit
/// is consumed by exactly one wait.
#[derive(Debug)]
pub struct WakeSignal {
    permit: AtomicBool,
    state: AtomicU8,
}

impl WakeSignal {
    pub const fn new() -> Self {
        Self {
            permit: AtomicBool::new(false),
            state: AtomicU8::new(ThreadState::Running as u8),
        }
    }

    /// Deposit the permit. Does not unpark anybody by itself.
    pub fn notify(&self) {
        self.permit.store(true, Ordering::Release);
    }

    /// Block the calling thread until the permit is available, then take it.
    ///
    /// Must only be called by the thread that owns this signal.
    pub fn wait(&self) {
        self.state.store(ThreadState::Suspended as u8, Ordering::Release);
        while !self.permit.swap(false, Ordering::AcqRel) {
            std::thread::park();
        }
        self.state.store(ThreadState::Running as u8, Ordering::Release);
    }

    pub fn has_permit(&self) -> bool {
        self.permit.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ThreadState {
        match self.state.load(Ordering::Acquire) {
            1 => ThreadState::Suspended,
            _ => ThreadState::Running,
        }
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}
