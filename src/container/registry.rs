//! Registry of live containers.
//!
//! Every method here expects to run under the scheduler's global lock; the
//! registry itself does no synchronization.

use super::{ContainerId, Group, Member};
use crate::errors::{ContainerResult, ResourceError};
use alloc::vec::Vec;
use log::{debug, trace};

/// How a new member entered its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The container was created for this member, which holds the turn.
    Seeded,
    /// The member joined an existing ring and must wait for its turn.
    Queued,
}

/// Ordered collection of non-empty groups.
#[derive(Debug)]
pub struct GroupRegistry<H> {
    groups: Vec<Group<H>>,
    max_groups: Option<usize>,
    max_members: Option<usize>,
}

impl<H: PartialEq> GroupRegistry<H> {
    pub const fn new() -> Self {
        Self::with_limits(None, None)
    }

    pub const fn with_limits(max_groups: Option<usize>, max_members: Option<usize>) -> Self {
        Self {
            groups: Vec::new(),
            max_groups,
            max_members,
        }
    }

    /// Number of live groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total members across all groups.
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn find(&self, id: ContainerId) -> Option<&Group<H>> {
        self.groups.iter().find(|g| g.id() == id)
    }

    pub fn find_mut(&mut self, id: ContainerId) -> Option<&mut Group<H>> {
        self.groups.iter_mut().find(|g| g.id() == id)
    }

    /// Return the group for `id`, creating an empty one if none exists.
    ///
    /// A freshly created group is empty and must receive a member before the
    /// lock is released, or be dropped again with [`remove_if_empty`].
    ///
    /// [`remove_if_empty`]: Self::remove_if_empty
    pub fn find_or_create(&mut self, id: ContainerId) -> ContainerResult<&mut Group<H>> {
        let index = match self.groups.iter().position(|g| g.id() == id) {
            Some(index) => index,
            None => {
                if self.max_groups.map_or(false, |max| self.groups.len() >= max) {
                    return Err(ResourceError::TooManyGroups.into());
                }
                self.groups.try_reserve(1)?;
                self.groups.push(Group::new(id));
                debug!("container {} created", id);
                self.groups.len() - 1
            }
        };
        Ok(&mut self.groups[index])
    }

    /// Unlink the group for `id` if it has no members left.
    ///
    /// Returns `true` if a group was removed.
    pub fn remove_if_empty(&mut self, id: ContainerId) -> bool {
        match self.groups.iter().position(|g| g.id() == id) {
            Some(index) if self.groups[index].is_empty() => {
                self.groups.remove(index);
                debug!("container {} destroyed", id);
                true
            }
            _ => false,
        }
    }

    /// Append `handle` to the group for `id`, creating the group if needed.
    ///
    /// Either the member is linked (and the group exists), or nothing in the
    /// registry changed.
    pub fn admit(&mut self, id: ContainerId, handle: H) -> ContainerResult<Admission> {
        let max_members = self.max_members;
        let result = self.find_or_create(id).and_then(|group| {
            if max_members.map_or(false, |max| group.len() >= max) {
                return Err(ResourceError::TooManyMembers.into());
            }
            let admission = if group.is_empty() {
                Admission::Seeded
            } else {
                Admission::Queued
            };
            group.append(Member::new(handle))?;
            trace!("container {} now has {} members", id, group.len());
            Ok(admission)
        });

        if result.is_err() {
            // A group created for this call must not outlive the failure.
            self.remove_if_empty(id);
        }
        result
    }

    /// Index of the group whose ring contains `handle`.
    pub fn locate(&self, handle: &H) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(handle))
    }

    pub fn group_at(&self, index: usize) -> Option<&Group<H>> {
        self.groups.get(index)
    }

    pub fn group_at_mut(&mut self, index: usize) -> Option<&mut Group<H>> {
        self.groups.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group<H>> {
        self.groups.iter()
    }
}

impl<H: PartialEq> Default for GroupRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
