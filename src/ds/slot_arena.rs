//! Generational slot arena.
//!
//! Values live in a `Vec` of slots addressed by [`SlotId`]. Freed slots are
//! recycled through a free list, and every slot carries a generation counter
//! that is bumped on removal, so an id handed out before a removal can never
//! address the value that later reuses the same index.
//!
//! ```text
//!   slots: [ (gen 0, Some(A)) | (gen 1, None) | (gen 0, Some(C)) ]
//!   free:  [ 1 ]
//!
//!   SlotId { index: 1, generation: 0 }  -> stale, resolves to None
//!   insert(D)                           -> SlotId { index: 1, generation: 1 }
//! ```

/// Stable handle into a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl SlotId {
    /// Position of the slot in the backing vector.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation the slot had when this id was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value` and returns its id, reusing a freed slot when one exists.
    pub fn insert(&mut self, value: T) -> SlotId {
        let id = match self.free_list.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.value.is_none());
                slot.value = Some(value);
                SlotId {
                    index,
                    generation: slot.generation,
                }
            },
            None => {
                let index = u32::try_from(self.slots.len()).expect("slot arena exceeded u32 slots");
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                SlotId {
                    index,
                    generation: 0,
                }
            },
        };
        self.len += 1;
        id
    }

    /// Removes the value behind `id`; stale or unknown ids return `None`.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slot_mut(id).and_then(|slot| slot.value.as_mut())
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value. Generations survive so ids issued earlier stay stale.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index as u32);
        }
        // Pop order hands out low indices first.
        self.free_list.reverse();
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_arena_insert_remove_reuse() {
        let mut arena = SlotArena::new();
        let id1 = arena.insert("a");
        let id2 = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id1), Some(&"a"));
        assert_eq!(arena.get(id2), Some(&"b"));

        assert_eq!(arena.remove(id1), Some("a"));
        assert_eq!(arena.len(), 1);

        let id3 = arena.insert("c");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(id3), Some(&"c"));
        assert_eq!(id1.index(), id3.index());
        assert_ne!(id1.generation(), id3.generation());
    }

    #[test]
    fn stale_id_does_not_reach_recycled_slot() {
        let mut arena = SlotArena::new();
        let old = arena.insert(1);
        arena.remove(old);
        let new = arena.insert(2);

        assert_eq!(old.index(), new.index());
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get_mut(old), None);
        assert_eq!(arena.remove(old), None);
        assert!(!arena.contains(old));
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn double_remove_is_none() {
        let mut arena = SlotArena::new();
        let id = arena.insert("x");
        assert_eq!(arena.remove(id), Some("x"));
        assert_eq!(arena.remove(id), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn clear_invalidates_existing_ids() {
        let mut arena = SlotArena::with_capacity(4);
        let a = arena.insert('a');
        let b = arena.insert('b');
        arena.clear();

        assert!(arena.is_empty());
        assert!(!arena.contains(a));
        assert!(!arena.contains(b));

        let c = arena.insert('c');
        assert_eq!(c.index(), 0);
        assert_eq!(arena.get(c), Some(&'c'));
        assert_eq!(arena.get(a), None);
    }

    #[test]
    fn iter_skips_vacant_slots() {
        let mut arena = SlotArena::new();
        let a = arena.insert(10);
        let b = arena.insert(20);
        let c = arena.insert(30);
        arena.remove(b);

        let live: Vec<_> = arena.iter().collect();
        assert_eq!(live, vec![(a, &10), (c, &30)]);
    }
}
