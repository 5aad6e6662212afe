//! Handles naming host threads.

use super::signal::WakeSignal;
use super::{ThreadId, ThreadState};
use core::fmt;
use std::sync::Arc;

/// Identity of a host thread plus the means to wake it.
///
/// Handles are cheap to clone and compare by [`ThreadId`] only.
#[derive(Clone)]
pub struct ThreadHandle {
    id: ThreadId,
    thread: std::thread::Thread,
    signal: Arc<WakeSignal>,
}

impl ThreadHandle {
    /// Build a handle for the calling thread with a fresh identity.
    pub(super) fn for_current(id: ThreadId) -> Self {
        Self {
            id,
            thread: std::thread::current(),
            signal: Arc::new(WakeSignal::new()),
        }
    }

    pub fn id(&self) -> ThreadId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.thread.name()
    }

    /// Whether the thread is parked in the scheduler right now.
    pub fn state(&self) -> ThreadState {
        self.signal.state()
    }

    pub(super) fn wait(&self) {
        self.signal.wait();
    }

    pub(super) fn wake(&self) {
        self.signal.notify();
        self.thread.unpark();
    }
}

impl PartialEq for ThreadHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ThreadHandle {}

impl fmt::Debug for ThreadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "thread {} ({})", self.id, name),
            None => write!(f, "thread {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::current_handle;
    use std::format;

    #[test]
    fn test_debug_shows_thread_name() {
        let handle = std::thread::Builder::new()
            .name("worker-7".into())
            .spawn(current_handle)
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(handle.name(), Some("worker-7"));
        assert_eq!(format!("{:?}", handle), format!("thread {} (worker-7)", handle.id()));
    }
}
