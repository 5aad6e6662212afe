#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![forbid(unreachable_pub)]

//! Group-aware cooperative thread scheduling.
//!
//! Threads join named *containers*. Exactly one member of each container
//! runs at a time; the others are suspended. A running member passes the
//! turn to the next member in join order by yielding, and leaves by
//! deregistering. Containers are created by their first member and vanish
//! with their last.
//!
//! # Features
//!
//! - `std-shim`: OS-thread backend ([`thread::HostParker`]) and the
//!   process-wide kernel behind [`register`], [`yield_turn`] and
//!   [`deregister`] (default)
//!
//! # Quick Start
//!
//! ```ignore
//! use processor_container::{deregister, register, yield_turn};
//!
//! let workers: Vec<_> = (0..3)
//!     .map(|_| std::thread::spawn(|| {
//!         register(7).unwrap();
//!         for _ in 0..10 {
//!             /* work while holding the turn */
//!             yield_turn(7).unwrap();
//!         }
//!         deregister(7).unwrap();
//!     }))
//!     .collect();
//! ```
//!
//! # Architecture
//!
//! - [`container`]: the ring of members per container and the registry
//! - [`sched`]: the [`Parker`] seam and the round-robin scheduler
//! - [`kernel`]: initialization, misuse policy and command dispatch
//! - [`thread`]: suspend/resume for OS threads

pub mod command;
pub mod config;
pub mod container;
pub mod errors;
pub mod kernel;
pub mod sched;
#[cfg(feature = "std-shim")]
pub mod thread;

#[cfg(test)]
mod tests;

#[cfg(any(test, feature = "std-shim"))]
extern crate std;

extern crate alloc;

// ============================================================================
// Public API
// ============================================================================

pub use command::{Command, ContainerCmd};
pub use config::{ContainerConfig, MisusePolicy};
pub use container::{ContainerId, Group, GroupRegistry, Member};
pub use errors::{ContainerError, ContainerResult};
pub use kernel::Kernel;
pub use sched::{Departure, Parker, RoundRobinScheduler, SchedulerStats, Turn};

#[cfg(feature = "std-shim")]
pub use kernel::default_kernel;
#[cfg(feature = "std-shim")]
pub use thread::{HostParker, ThreadHandle};

// ============================================================================
// Convenience Functions
// ============================================================================

/// Join container `cid` on the process-wide kernel.
///
/// Returns at once for the first member of a container; otherwise blocks
/// until the calling thread is handed the turn.
#[cfg(feature = "std-shim")]
pub fn register(cid: ContainerId) -> ContainerResult<()> {
    kernel::default_kernel().register(cid)
}

/// Hand the turn to the next member of container `cid` and wait for it to
/// come back around.
#[cfg(feature = "std-shim")]
pub fn yield_turn(cid: ContainerId) -> ContainerResult<()> {
    kernel::default_kernel().yield_turn(cid)
}

/// Leave the calling thread's container on the process-wide kernel.
#[cfg(feature = "std-shim")]
pub fn deregister(cid: ContainerId) -> ContainerResult<()> {
    kernel::default_kernel().deregister(cid)
}
