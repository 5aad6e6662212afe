//! Round-robin cooperative scheduler over containers.

use super::trait_def::Parker;
use crate::config::ContainerConfig;
use crate::container::{Admission, ContainerId, GroupRegistry, Removal};
use crate::errors::{ContainerResult, ProtocolError};
use alloc::vec::Vec;
use log::{debug, trace};
use portable_atomic::{AtomicU64, Ordering};

/// How a `register` or `yield_turn` call got its turn back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// The caller seeded a new container and runs without suspending.
    Granted,
    /// The caller kept its turn: it is alone, or it does not hold the turn.
    Kept,
    /// The caller was suspended and later resumed by another member.
    Resumed,
}

/// What a `deregister` call did to the caller's container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The caller was the last member; the container is gone.
    Teardown,
    /// The caller held the turn; its successor was resumed.
    Handoff,
    /// The caller was waiting; nobody was woken.
    Unlinked,
}

/// Point-in-time scheduler statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerStats {
    /// Live containers
    pub groups: usize,
    /// Registered threads across all containers
    pub members: usize,
    /// Successful registrations since creation
    pub registrations: u64,
    /// Yields that passed the turn to another member
    pub handoffs: u64,
    /// Successful deregistrations since creation
    pub deregistrations: u64,
}

/// Cooperative scheduler running one member per container at a time.
///
/// All registry state sits behind a single spin lock. The lock is never held
/// across a suspension: every blocking path mutates the ring, resumes the
/// new current member, drops the lock and only then suspends.
pub struct RoundRobinScheduler<P: Parker> {
    registry: spin::Mutex<GroupRegistry<P::Handle>>,
    parker: P,
    registrations: AtomicU64,
    handoffs: AtomicU64,
    deregistrations: AtomicU64,
}

impl<P: Parker> RoundRobinScheduler<P> {
    /// Create a scheduler with no limits.
    pub const fn new(parker: P) -> Self {
        Self::with_config(parker, ContainerConfig::new())
    }

    /// Create a scheduler that enforces the limits in `config`.
    pub const fn with_config(parker: P, config: ContainerConfig) -> Self {
        Self {
            registry: spin::Mutex::new(GroupRegistry::with_limits(
                config.group_limit(),
                config.member_limit(),
            )),
            parker,
            registrations: AtomicU64::new(0),
            handoffs: AtomicU64::new(0),
            deregistrations: AtomicU64::new(0),
        }
    }

    pub fn parker(&self) -> &P {
        &self.parker
    }

    /// Join container `id`, creating it if it does not exist.
    ///
    /// The first member of a container returns at once holding the turn.
    /// Later members block until the ring hands them the turn.
    ///
    /// # Arguments
    ///
    /// * `id` - Container to join
    ///
    /// # Returns
    ///
    /// `Turn::Granted` for the seeding member, `Turn::Resumed` once a queued
    /// member is handed the turn, or `AlreadyRegistered` if the caller is
    /// already in a container.
    pub fn register(&self, id: ContainerId) -> ContainerResult<Turn> {
        let me = self.parker.current();
        let mut registry = self.registry.lock();

        if registry.locate(&me).is_some() {
            return Err(ProtocolError::AlreadyRegistered.into());
        }
        let admission = registry.admit(id, me.clone())?;
        drop(registry);
        self.registrations.fetch_add(1, Ordering::Relaxed);

        match admission {
            Admission::Seeded => {
                debug!("{:?} seeded container {}", me, id);
                Ok(Turn::Granted)
            }
            Admission::Queued => {
                trace!("{:?} queued in container {}", me, id);
                self.parker.suspend_self(&me);
                Ok(Turn::Resumed)
            }
        }
    }

    /// Pass the turn to the next member of container `id`.
    ///
    /// A lone member, or a member that does not hold the turn, keeps running.
    ///
    /// # Arguments
    ///
    /// * `id` - Container the caller belongs to
    ///
    /// # Returns
    ///
    /// `Turn::Kept` if no handoff happened, `Turn::Resumed` after the ring
    /// came back around, or `NotRegistered` if the caller is not a member
    /// of `id`.
    pub fn yield_turn(&self, id: ContainerId) -> ContainerResult<Turn> {
        let me = self.parker.current();
        let mut registry = self.registry.lock();

        let group = match registry.find_mut(id) {
            Some(group) if group.contains(&me) => group,
            _ => return Err(ProtocolError::NotRegistered.into()),
        };
        if group.len() == 1 || !group.is_current(&me) {
            return Ok(Turn::Kept);
        }

        group.advance();
        let next = match group.current() {
            Some(member) => member.handle().clone(),
            None => return Ok(Turn::Kept),
        };
        trace!("container {}: {:?} -> {:?}", id, me, next);
        self.parker.resume(&next);
        drop(registry);

        self.handoffs.fetch_add(1, Ordering::Relaxed);
        self.parker.suspend_self(&me);
        Ok(Turn::Resumed)
    }

    /// Leave whichever container holds the calling thread.
    ///
    /// The member is matched by identity alone; `id` is only used for
    /// diagnostics.
    ///
    /// Only the member holding the turn resumes its successor. A waiting
    /// member leaves without waking anyone, since the current member is
    /// still running and a second resume would let two members run at once.
    ///
    /// # Arguments
    ///
    /// * `id` - Container the caller believes it belongs to
    ///
    /// # Returns
    ///
    /// The [`Departure`] describing what happened to the ring, or
    /// `NotRegistered` if the caller is in no container.
    pub fn deregister(&self, id: ContainerId) -> ContainerResult<Departure> {
        let me = self.parker.current();
        let mut registry = self.registry.lock();

        let index = registry
            .locate(&me)
            .ok_or(ProtocolError::NotRegistered)?;
        let group = match registry.group_at_mut(index) {
            Some(group) => group,
            None => return Err(ProtocolError::NotRegistered.into()),
        };
        let group_id = group.id();
        if group_id != id {
            debug!("{:?} deregistering from {} while naming {}", me, group_id, id);
        }

        let departure = match group.remove(&me) {
            Some(Removal::Emptied) => {
                registry.remove_if_empty(group_id);
                Departure::Teardown
            }
            Some(Removal::CurrentAdvanced) => {
                if let Some(next) = group.current() {
                    trace!("container {}: {:?} left, resuming {:?}", group_id, me, next.handle());
                    self.parker.resume(next.handle());
                }
                Departure::Handoff
            }
            Some(Removal::Unlinked) => Departure::Unlinked,
            None => return Err(ProtocolError::NotRegistered.into()),
        };
        drop(registry);

        self.deregistrations.fetch_add(1, Ordering::Relaxed);
        Ok(departure)
    }

    /// Whether `handle` is a member of any container.
    pub fn is_registered(&self, handle: &P::Handle) -> bool {
        self.registry.lock().locate(handle).is_some()
    }

    /// Members of container `id` in ring order from the head.
    pub fn group_members(&self, id: ContainerId) -> Option<Vec<P::Handle>> {
        let registry = self.registry.lock();
        registry
            .find(id)
            .map(|group| group.members().map(|m| m.handle().clone()).collect())
    }

    /// Member holding the turn in container `id`.
    pub fn current_of(&self, id: ContainerId) -> Option<P::Handle> {
        let registry = self.registry.lock();
        registry
            .find(id)
            .and_then(|group| group.current())
            .map(|m| m.handle().clone())
    }

    pub fn stats(&self) -> SchedulerStats {
        let registry = self.registry.lock();
        SchedulerStats {
            groups: registry.len(),
            members: registry.member_count(),
            registrations: self.registrations.load(Ordering::Relaxed),
            handoffs: self.handoffs.load(Ordering::Relaxed),
            deregistrations: self.deregistrations.load(Ordering::Relaxed),
        }
    }
}
