//! Shared lease on a tracked ring buffer.
//!
//! The tracker owns every ring buffer, but callers need to append into the
//! buffer they just looked up. A [`BufferHandle`] is a cheap, cloneable lease
//! (`Arc` + `parking_lot::Mutex`) on one buffer. When the tracker evicts the
//! key, it clears the buffer and marks the lease detached; the handle keeps
//! working for reads and appends, but nothing written through it is tracked
//! anymore.
//!
//! ```text
//!   TrackerCore ──owns──► Entry { handle } ──Arc──┐
//!                                                 ▼
//!   caller ─────holds──► BufferHandle ──Arc──► Shared { Mutex<RingBuffer>, tracked }
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::ds::RingBuffer;
use crate::error::Result;

struct Shared<E> {
    ring: Mutex<RingBuffer<E>>,
    tracked: AtomicBool,
}

/// Cloneable lease on the ring buffer tracked for one key.
pub struct BufferHandle<E> {
    key: Arc<str>,
    shared: Arc<Shared<E>>,
}

impl<E> BufferHandle<E> {
    pub(crate) fn new(key: Arc<str>, capacity: usize) -> Result<Self> {
        let ring = RingBuffer::new(capacity)?;
        Ok(Self {
            key,
            shared: Arc::new(Shared {
                ring: Mutex::new(ring),
                tracked: AtomicBool::new(true),
            }),
        })
    }

    /// Clears the buffer and marks the lease as no longer tracked.
    pub(crate) fn detach(&self) {
        self.shared.tracked.store(false, Ordering::Release);
        self.shared.ring.lock().clear();
    }

    pub(crate) fn key_arc(&self) -> Arc<str> {
        Arc::clone(&self.key)
    }

    /// Key this buffer was created for.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns `false` once the tracker has evicted or released this buffer.
    pub fn is_tracked(&self) -> bool {
        self.shared.tracked.load(Ordering::Acquire)
    }

    /// Appends an element, overwriting the oldest one when the buffer is full.
    pub fn append(&self, element: E) {
        self.shared.ring.lock().append(element);
    }

    /// Number of retained elements.
    pub fn len(&self) -> usize {
        self.shared.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.ring.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.shared.ring.lock().capacity()
    }

    /// Clones the `index`-th retained element, oldest first.
    pub fn get(&self, index: usize) -> Result<E>
    where
        E: Clone,
    {
        self.shared.ring.lock().get(index).cloned()
    }

    /// Clones all retained elements, oldest first.
    pub fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.shared.ring.lock().to_vec()
    }

    /// Runs `f` with shared access to the buffer while holding its lock.
    ///
    /// `f` must not call into the tracker that produced this handle. The
    /// tracker takes its own lock before buffer locks, so doing that from
    /// inside `f` inverts the lock order and can deadlock against a
    /// concurrent [`BufferTracker::record`](crate::tracker::BufferTracker::record)
    /// or eviction.
    pub fn with<R>(&self, f: impl FnOnce(&RingBuffer<E>) -> R) -> R {
        f(&self.shared.ring.lock())
    }

    /// Returns `true` if both handles lease the same buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<E> Clone for BufferHandle<E> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<E> fmt::Debug for BufferHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferHandle")
            .field("key", &self.key)
            .field("tracked", &self.is_tracked())
            .finish_non_exhaustive()
    }
}
