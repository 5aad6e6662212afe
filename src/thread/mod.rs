//! Host-thread layer: identities and suspend/resume for OS threads.

use crate::sched::Parker;
use core::num::NonZeroU64;
use portable_atomic::{AtomicU64, Ordering};

pub mod handle;
pub mod signal;

pub use handle::ThreadHandle;
pub use signal::WakeSignal;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

std::thread_local! {
    static CURRENT: ThreadHandle = ThreadHandle::for_current(ThreadId::next());
}

/// Process-unique identifier of a host thread. Never zero, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(NonZeroU64);

impl core::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

impl ThreadId {
    fn next() -> Self {
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        // Counter starts at 1; wrapping would take 2^64 threads.
        Self(NonZeroU64::new(id).unwrap_or(NonZeroU64::MIN))
    }

    pub fn as_u64(self) -> u64 {
        self.0.get()
    }
}

/// Run state of a host thread as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadState {
    Running = 0,
    Suspended = 1,
}

/// Handle of the calling thread.
pub fn current_handle() -> ThreadHandle {
    CURRENT.with(ThreadHandle::clone)
}

/// [`Parker`] over OS threads.
///
/// Each thread owns a [`WakeSignal`]; resuming deposits its permit and
/// unparks it, suspending waits for the permit.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostParker;

impl HostParker {
    pub const fn new() -> Self {
        Self
    }
}

impl Parker for HostParker {
    type Handle = ThreadHandle;

    fn current(&self) -> ThreadHandle {
        current_handle()
    }

    fn suspend_self(&self, me: &ThreadHandle) {
        me.wait();
    }

    fn resume(&self, target: &ThreadHandle) {
        target.wake();
    }
}
