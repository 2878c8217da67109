//! Doubly linked recency list backed by a [`SlotArena`].
//!
//! Nodes live in the arena and link to each other by [`SlotId`], so there are
//! no raw pointers and no ownership cycles. The front of the list is the
//! least-recently-used end, the back is the most-recently-used end.
//!
//! ```text
//!   arena (SlotArena<Node<T>>)
//!   ┌────────┬──────────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                   │
//!   ├────────┼──────────────────────────────────────────────┤
//!   │ id_1   │ { value: A, prev: None,       next: id_2 }   │
//!   │ id_2   │ { value: B, prev: Some(id_1), next: id_3 }   │
//!   │ id_3   │ { value: C, prev: Some(id_2), next: None }   │
//!   └────────┴──────────────────────────────────────────────┘
//!
//!   front (LRU) ─► [id_1] ◄──► [id_2] ◄──► [id_3] ◄─ back (MRU)
//! ```
//!
//! | Operation          | Time |
//! |--------------------|------|
//! | `push_back`        | O(1) |
//! | `pop_front`        | O(1) |
//! | `move_to_back`     | O(1) |
//! | `remove`           | O(1) |
//! | `iter`             | O(n) |
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Arena-backed doubly linked list with O(1) relinking by [`SlotId`].
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Id of the least-recently-used node.
    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Id of the most-recently-used node.
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Appends `value` at the back and returns its id.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail.and_then(|tail| self.arena.get_mut(tail)) {
            Some(old_tail) => old_tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Unlinks and returns the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    /// Unlinks `id` and returns its value; stale ids return `None`.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.unlink(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Relinks `id` at the back. Returns `false` if `id` is not in the list.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.tail == Some(id) {
            return true;
        }
        self.unlink(id);
        self.link_back(id);
        true
    }

    /// Iterates values from front (LRU) to back (MRU).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Iterates `(SlotId, &T)` pairs from front to back.
    pub fn iter_entries(&self) -> EntryIter<'_, T> {
        EntryIter {
            list: self,
            current: self.head,
        }
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    fn unlink(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            (node.prev, node.next)
        };

        match prev.and_then(|p| self.arena.get_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.arena.get_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        let node = self.arena.get_mut(id)?;
        node.prev = None;
        node.next = None;
        Some(())
    }

    fn link_back(&mut self, id: SlotId) {
        let old_tail = self.tail;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = old_tail;
            node.next = None;
        } else {
            return;
        }
        match old_tail.and_then(|t| self.arena.get_mut(t)) {
            Some(tail_node) => tail_node.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len(), 0);
            return;
        }

        let mut seen = std::collections::HashSet::new();
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            assert!(seen.insert(id), "cycle at {:?}", id);
            let node = self.arena.get(id).expect("linked node missing from arena");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
        }
        assert_eq!(seen.len(), self.len());
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}

pub struct EntryIter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for EntryIter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some((id, &node.value))
    }
}
