//! Suspend/resume capability consumed by the scheduler.

use core::fmt::Debug;

/// Blocks and wakes thread contexts on behalf of the scheduler.
///
/// The scheduler never touches threads directly: it asks the parker who is
/// calling, and tells it whom to suspend and whom to resume. Implementations
/// decide what a "thread" is (OS thread, green thread, kernel task).
///
/// # Contract
///
/// - A `resume` delivered before the target reaches `suspend_self` is not
///   lost: the later `suspend_self` returns immediately.
/// - One `resume` releases at most one `suspend_self`.
pub trait Parker: Send + Sync {
    /// Stable identity of a thread context. Two handles compare equal iff
    /// they name the same thread.
    type Handle: Clone + PartialEq + Debug + Send;

    /// Handle of the calling thread.
    fn current(&self) -> Self::Handle;

    /// Block the calling thread until it is resumed.
    ///
    /// `me` is the caller's own handle, as returned by [`current`].
    ///
    /// [`current`]: Parker::current
    fn suspend_self(&self, me: &Self::Handle);

    /// Make `target` runnable again.
    ///
    /// Called with the scheduler lock held, so it must not block.
    fn resume(&self, target: &Self::Handle);
}
