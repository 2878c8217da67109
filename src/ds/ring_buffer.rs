//! Fixed-capacity ring buffer that keeps the most recent elements.
//!
//! Appends never fail: once the buffer is full, each append overwrites the
//! oldest retained element. Reads are always chronological (oldest first),
//! independent of where the write cursor currently sits.
//!
//! ## Architecture
//!
//! ```text
//!   capacity = 3, after appending 1, 2, 3, 4, 5
//!
//!   Index:     0     1     2
//!            ┌─────┬─────┬─────┐
//!   slots:   │  4  │  5  │  3  │
//!            └─────┴─────┴─────┘
//!                          ▲
//!                          └── cursor = 2 (next write, also the oldest)
//!
//!   get(i) = slots[(cursor + capacity - len + i) % capacity]
//!   get(0) = 3, get(1) = 4, get(2) = 5
//! ```
//!
//! ## Operations
//!
//! | Operation   | Description                              | Complexity |
//! |-------------|------------------------------------------|------------|
//! | [`append`]  | Add element, overwrite oldest when full  | O(1)       |
//! | [`get`]     | i-th retained element, oldest first      | O(1)       |
//! | [`len`]     | `min(total appended, capacity)`          | O(1)       |
//! | [`clear`]   | Drop retained elements, reset cursor     | O(N)       |
//! | [`iter`]    | Oldest-to-newest borrowed iteration      | O(N)       |
//!
//! [`append`]: RingBuffer::append
//! [`get`]: RingBuffer::get
//! [`len`]: RingBuffer::len
//! [`clear`]: RingBuffer::clear
//! [`iter`]: RingBuffer::iter
//!
//! ## Example
//!
//! ```
//! use ringtrack::ds::RingBuffer;
//!
//! let mut ring = RingBuffer::new(3).unwrap();
//! for n in 1..=5 {
//!     ring.append(n);
//! }
//! assert_eq!(ring.len(), 3);
//! assert_eq!(ring.to_vec(), vec![3, 4, 5]);
//! assert!(ring.get(3).is_err());
//! ```
//!
//! ## Thread Safety
//!
//! `RingBuffer` is not synchronized. The tracker hands it out behind a
//! `parking_lot::Mutex` inside a [`BufferHandle`](crate::tracker::BufferHandle).

use std::fmt;
use std::iter::FusedIterator;

use crate::error::BufferError;

/// Ring buffer retaining the last `capacity` appended elements.
pub struct RingBuffer<E> {
    slots: Box<[Option<E>]>,
    cursor: usize,
    len: usize,
}

impl<E> RingBuffer<E> {
    /// Creates an empty buffer holding at most `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity(capacity));
        }
        let slots = std::iter::repeat_with(|| None).take(capacity).collect();
        Ok(Self {
            slots,
            cursor: 0,
            len: 0,
        })
    }

    /// Maximum number of retained elements. Fixed for the buffer's lifetime.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of retained elements, `min(total appended, capacity)`.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Appends `element`, overwriting the oldest one when the buffer is full.
    pub fn append(&mut self, element: E) {
        self.slots[self.cursor] = Some(element);
        self.cursor = (self.cursor + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
    }

    /// Returns the `index`-th retained element in chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::IndexOutOfRange`] when `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&E, BufferError> {
        if index >= self.len {
            return Err(BufferError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.slots[self.physical(index)]
            .as_ref()
            .ok_or(BufferError::IndexOutOfRange {
                index,
                len: self.len,
            })
    }

    /// Oldest retained element.
    pub fn oldest(&self) -> Option<&E> {
        self.get(0).ok()
    }

    /// Most recently appended element.
    pub fn newest(&self) -> Option<&E> {
        self.len.checked_sub(1).and_then(|last| self.get(last).ok())
    }

    /// Drops every retained element and resets the cursor.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.cursor = 0;
        self.len = 0;
    }

    /// Iterates retained elements from oldest to newest.
    pub fn iter(&self) -> Iter<'_, E> {
        Iter {
            ring: self,
            front: 0,
            back: self.len,
        }
    }

    /// Clones retained elements into a `Vec`, oldest first.
    pub fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.iter().cloned().collect()
    }

    #[inline]
    fn physical(&self, logical: usize) -> usize {
        let cap = self.capacity();
        (self.cursor + cap - self.len + logical) % cap
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.capacity() > 0);
        assert!(self.cursor < self.capacity());
        assert!(self.len <= self.capacity());
        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len);
        for logical in 0..self.len {
            assert!(self.slots[self.physical(logical)].is_some());
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for RingBuffer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Borrowed iterator over a [`RingBuffer`], oldest first.
pub struct Iter<'a, E> {
    ring: &'a RingBuffer<E>,
    front: usize,
    back: usize,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.ring.get(self.front).ok();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<E> DoubleEndedIterator for Iter<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.ring.get(self.back).ok()
    }
}

impl<E> ExactSizeIterator for Iter<'_, E> {}
impl<E> FusedIterator for Iter<'_, E> {}

impl<'a, E> IntoIterator for &'a RingBuffer<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
