//! Containers: named groups of threads sharing one execution turn.
//!
//! A [`Group`] owns its members in join order and treats that sequence as a
//! ring. The turn is tracked as an index into the ring rather than a
//! pointer, so unlinking a member can never leave the cursor dangling.

pub mod registry;

pub use registry::{Admission, GroupRegistry};

use crate::errors::ContainerResult;
use alloc::vec::Vec;

/// Identifier of a container, supplied by callers.
pub type ContainerId = u64;

/// A thread's registration record within a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member<H> {
    handle: H,
}

impl<H> Member<H> {
    pub fn new(handle: H) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }
}

/// What happened to the ring when a member was unlinked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The member was the last one; the group is now empty.
    Emptied,
    /// The member held the turn; the cursor moved to its successor.
    CurrentAdvanced,
    /// The member was waiting; the cursor did not move.
    Unlinked,
}

/// A container and its ring of members.
#[derive(Debug)]
pub struct Group<H> {
    id: ContainerId,
    members: Vec<Member<H>>,
    /// Index of the member holding the turn. Meaningless while empty.
    current: usize,
}

impl<H: PartialEq> Group<H> {
    /// Create an empty group. Callers must populate it before it becomes
    /// visible outside the registry lock.
    pub const fn new(id: ContainerId) -> Self {
        Self {
            id,
            members: Vec::new(),
            current: 0,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Add a member at the tail of the ring.
    ///
    /// The first member of an empty ring becomes current. Fails without
    /// touching the ring if storage cannot grow.
    pub fn append(&mut self, member: Member<H>) -> ContainerResult<()> {
        self.members.try_reserve(1)?;
        if self.members.is_empty() {
            self.current = 0;
        }
        self.members.push(member);
        Ok(())
    }

    /// Pass the turn to the ring successor of the current member.
    pub fn advance(&mut self) {
        if self.members.len() > 1 {
            self.current = self.successor(self.current);
        }
    }

    /// Unlink the member identified by `handle`.
    ///
    /// Returns `None` if the handle is not in this ring.
    pub fn remove(&mut self, handle: &H) -> Option<Removal> {
        let index = self.position(handle)?;

        if self.members.len() == 1 {
            self.members.clear();
            self.current = 0;
            return Some(Removal::Emptied);
        }

        if index == self.current {
            // Successor is chosen before the unlink; after removal it
            // slides into `index`, or wraps to the head if we were the tail.
            let successor = self.successor(index);
            self.members.remove(index);
            self.current = if successor > index { successor - 1 } else { successor };
            Some(Removal::CurrentAdvanced)
        } else {
            self.members.remove(index);
            if index < self.current {
                self.current -= 1;
            }
            Some(Removal::Unlinked)
        }
    }

    /// Ring position of `handle`, if it is a member.
    pub fn position(&self, handle: &H) -> Option<usize> {
        self.members.iter().position(|m| m.handle() == handle)
    }

    pub fn contains(&self, handle: &H) -> bool {
        self.position(handle).is_some()
    }

    /// Member holding the turn.
    pub fn current(&self) -> Option<&Member<H>> {
        self.members.get(self.current)
    }

    pub fn current_index(&self) -> Option<usize> {
        if self.members.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    pub fn is_current(&self, handle: &H) -> bool {
        self.current().map_or(false, |m| m.handle() == handle)
    }

    /// Ring successor of the member at `index`, wrapping after the tail.
    pub fn successor(&self, index: usize) -> usize {
        (index + 1) % self.members.len()
    }

    /// Members in join order, starting at the head of the ring.
    pub fn members(&self) -> impl Iterator<Item = &Member<H>> {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn ring(handles: &[u32]) -> Group<u32> {
        let mut group = Group::new(1);
        for &h in handles {
            group.append(Member::new(h)).unwrap();
        }
        group
    }

    fn order(group: &Group<u32>) -> Vec<u32> {
        group.members().map(|m| *m.handle()).collect()
    }

    #[test]
    fn test_first_append_becomes_current() {
        let mut group = Group::new(7);
        assert_eq!(group.current_index(), None);
        group.append(Member::new(10u32)).unwrap();
        assert!(group.is_current(&10));

        group.append(Member::new(11)).unwrap();
        assert!(group.is_current(&10));
        assert_eq!(order(&group), vec![10, 11]);
    }

    #[test]
    fn test_advance_wraps() {
        let mut group = ring(&[1, 2, 3]);
        group.advance();
        assert!(group.is_current(&2));
        group.advance();
        assert!(group.is_current(&3));
        group.advance();
        assert!(group.is_current(&1));
    }

    #[test]
    fn test_advance_singleton_is_noop() {
        let mut group = ring(&[1]);
        group.advance();
        assert_eq!(group.current_index(), Some(0));
    }

    #[test]
    fn test_remove_current_head_promotes_successor() {
        let mut group = ring(&[1, 2, 3]);
        assert_eq!(group.remove(&1), Some(Removal::CurrentAdvanced));
        assert!(group.is_current(&2));
        assert_eq!(order(&group), vec![2, 3]);
    }

    #[test]
    fn test_remove_current_tail_wraps_to_head() {
        let mut group = ring(&[1, 2, 3]);
        group.advance();
        group.advance();
        assert_eq!(group.remove(&3), Some(Removal::CurrentAdvanced));
        assert!(group.is_current(&1));
        assert_eq!(order(&group), vec![1, 2]);
    }

    #[test]
    fn test_remove_waiting_member_keeps_cursor() {
        let mut group = ring(&[1, 2, 3]);
        group.advance();
        group.advance();
        assert_eq!(group.remove(&1), Some(Removal::Unlinked));
        assert!(group.is_current(&3));
        assert_eq!(group.remove(&2), Some(Removal::Unlinked));
        assert!(group.is_current(&3));
    }

    #[test]
    fn test_remove_last_member_empties() {
        let mut group = ring(&[4]);
        assert_eq!(group.remove(&4), Some(Removal::Emptied));
        assert!(group.is_empty());
        assert!(group.current().is_none());
    }

    #[test]
    fn test_remove_stranger() {
        let mut group = ring(&[1, 2]);
        assert_eq!(group.remove(&9), None);
        assert_eq!(group.len(), 2);
    }
}
