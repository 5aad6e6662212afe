//! Container scheduling.
//!
//! Provides the suspend/resume seam and the round-robin scheduler that
//! drives hand-off within each container.

pub mod rr;
pub mod trait_def;

pub use rr::{Departure, RoundRobinScheduler, SchedulerStats, Turn};
pub use trait_def::Parker;
