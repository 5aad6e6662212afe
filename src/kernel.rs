//! Kernel front object for the container scheduler.
//!
//! The `Kernel` owns the scheduler, applies the configured misuse policy and
//! dispatches raw boundary commands.

use crate::command::{Command, ContainerCmd};
use crate::config::{ContainerConfig, MisusePolicy};
use crate::container::ContainerId;
use crate::errors::{ContainerError, ContainerResult};
use crate::sched::{Parker, RoundRobinScheduler};
use log::warn;
use portable_atomic::{AtomicBool, Ordering};

/// Main handle of the container scheduler.
///
/// # Type Parameters
///
/// * `P` - Suspend/resume implementation for the threads being scheduled
pub struct Kernel<P: Parker> {
    scheduler: RoundRobinScheduler<P>,
    config: ContainerConfig,
    initialized: AtomicBool,
}

impl<P: Parker> Kernel<P> {
    /// Create a kernel. It rejects commands until [`init`](Self::init).
    pub const fn new(parker: P, config: ContainerConfig) -> Self {
        Self {
            scheduler: RoundRobinScheduler::with_config(parker, config),
            config,
            initialized: AtomicBool::new(false),
        }
    }

    /// Initialize the kernel.
    ///
    /// # Returns
    ///
    /// `Err(AlreadyInitialized)` on every call after the first.
    pub fn init(&self) -> ContainerResult<()> {
        self.initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| ContainerError::AlreadyInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &RoundRobinScheduler<P> {
        &self.scheduler
    }

    /// Join container `cid`; blocks until the caller holds the turn.
    ///
    /// # Arguments
    ///
    /// * `cid` - Container to join
    ///
    /// # Returns
    ///
    /// `Ok(())` once the caller holds the turn. Protocol misuse is folded
    /// through the configured [`MisusePolicy`].
    pub fn register(&self, cid: ContainerId) -> ContainerResult<()> {
        self.ensure_initialized()?;
        let result = self.scheduler.register(cid).map(|_| ());
        self.apply_policy(Command::Register, cid, result)
    }

    /// Pass the turn within container `cid`.
    ///
    /// # Arguments
    ///
    /// * `cid` - Container the caller belongs to
    ///
    /// # Returns
    ///
    /// `Ok(())` when the caller runs again, or `NotInitialized` before
    /// [`init`](Self::init).
    pub fn yield_turn(&self, cid: ContainerId) -> ContainerResult<()> {
        self.ensure_initialized()?;
        let result = self.scheduler.yield_turn(cid).map(|_| ());
        self.apply_policy(Command::Yield, cid, result)
    }

    /// Leave the caller's container.
    ///
    /// # Arguments
    ///
    /// * `cid` - Container the caller believes it belongs to
    ///
    /// # Returns
    ///
    /// `Ok(())` once the caller is gone from the registry, or the reported
    /// misuse under [`MisusePolicy::Report`].
    pub fn deregister(&self, cid: ContainerId) -> ContainerResult<()> {
        self.ensure_initialized()?;
        let result = self.scheduler.deregister(cid).map(|_| ());
        self.apply_policy(Command::Deregister, cid, result)
    }

    /// Dispatch a raw command code.
    pub fn ioctl(&self, raw: u32, cmd: &ContainerCmd) -> ContainerResult<()> {
        match Command::from_raw(raw)? {
            Command::Register => self.register(cmd.cid),
            Command::Yield => self.yield_turn(cmd.cid),
            Command::Deregister => self.deregister(cmd.cid),
        }
    }

    /// Like [`ioctl`](Self::ioctl), with the result folded into `0` or a
    /// negative errno.
    pub fn ioctl_errno(&self, raw: u32, cmd: &ContainerCmd) -> i32 {
        match self.ioctl(raw, cmd) {
            Ok(()) => 0,
            Err(e) => e.errno(),
        }
    }

    fn ensure_initialized(&self) -> ContainerResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(ContainerError::NotInitialized)
        }
    }

    fn apply_policy(
        &self,
        command: Command,
        cid: ContainerId,
        result: ContainerResult<()>,
    ) -> ContainerResult<()> {
        match result {
            Err(e) if e.is_misuse() => {
                warn!("{:?} on container {} ignored: {}", command, cid, e);
                match self.config().misuse_policy() {
                    MisusePolicy::Silent => Ok(()),
                    MisusePolicy::Report => Err(e),
                }
            }
            other => other,
        }
    }
}

#[cfg(feature = "std-shim")]
mod global {
    use super::Kernel;
    use crate::config::ContainerConfig;
    use crate::thread::HostParker;

    static DEFAULT_KERNEL: spin::Lazy<Kernel<HostParker>> = spin::Lazy::new(|| {
        let kernel = Kernel::new(HostParker::new(), ContainerConfig::new());
        // Fresh kernel; init cannot have run yet.
        let _ = kernel.init();
        kernel
    });

    /// Process-wide kernel used by the crate-level convenience functions.
    pub fn default_kernel() -> &'static Kernel<HostParker> {
        &DEFAULT_KERNEL
    }
}

#[cfg(feature = "std-shim")]
pub use global::default_kernel;
