//! Fixed-capacity circular byte store.
//!
//! Layout:
//!
//! ```text
//! +--------------------------------------------------+
//! | buffer (capacity bytes)                          |
//! +--------------------------------------------------+
//!     ^ tail (next read)        ^ head (next write)
//! ```
//!
//! One slot is permanently reserved so that `head == tail` unambiguously
//! means empty and `(head + 1) % capacity == tail` means full:
//!
//! * `used = (head - tail + capacity) % capacity`
//! * `free = capacity - 1 - used`
//!
//! The store owns no synchronization and no framing semantics. Callers hold
//! their own lock across any sequence of operations that must be observed
//! atomically; [`crate::FrameCodec`] builds packet framing on top.

use crate::{RingError, RingResult};

/// Smallest capacity able to hold the reserved slot plus one byte.
const MIN_CAPACITY: usize = 2;

/// Circular byte buffer with head/tail cursors and a reserved slot.
///
/// All operations complete in time bounded by the number of bytes moved;
/// none of them block or allocate after construction.
pub struct RingStore {
    buf: Box<[u8]>,
    head: usize,
    tail: usize,
}

impl RingStore {
    /// Creates a zeroed store with `capacity` total bytes (`capacity - 1` usable).
    pub fn new(capacity: usize) -> RingResult<Self> {
        if capacity < MIN_CAPACITY {
            return Err(RingError::InvalidCapacity {
                requested: capacity,
                minimum: MIN_CAPACITY,
            });
        }
        Ok(Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
        })
    }

    /// Total capacity in bytes, including the reserved slot.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of stored bytes available to read.
    pub fn used(&self) -> usize {
        (self.head + self.capacity() - self.tail) % self.capacity()
    }

    /// Number of bytes a write may still consume.
    pub fn free(&self) -> usize {
        self.capacity() - 1 - self.used()
    }

    /// True when no bytes are stored.
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Copies `data` into the store, advancing `head`.
    ///
    /// All-or-nothing: returns `false` and leaves the cursors and contents
    /// untouched when `free()` cannot hold the whole slice. Partial writes
    /// are never performed.
    pub fn write_raw(&mut self, data: &[u8]) -> bool {
        if self.free() < data.len() {
            return false;
        }
        let capacity = self.capacity();
        for &byte in data {
            self.buf[self.head] = byte;
            self.head = (self.head + 1) % capacity;
        }
        true
    }

    /// Copies up to `out.len()` stored bytes into `out`, advancing `tail`.
    ///
    /// Returns the number of bytes actually copied, which is
    /// `min(used(), out.len())`.
    pub fn read_raw(&mut self, out: &mut [u8]) -> usize {
        let n = self.used().min(out.len());
        let capacity = self.capacity();
        for slot in out.iter_mut().take(n) {
            *slot = self.buf[self.tail];
            self.tail = (self.tail + 1) % capacity;
        }
        n
    }

    /// Copies up to `out.len()` stored bytes into `out` without consuming them.
    pub fn peek_raw(&self, out: &mut [u8]) -> usize {
        self.peek_raw_at(0, out)
    }

    /// Non-consuming look-ahead starting `offset` bytes past `tail`.
    ///
    /// Lets a framing layer inspect a length header and then the bytes behind
    /// it before deciding whether to consume anything. Returns the number of
    /// bytes copied, clamped to what is stored past `offset`.
    pub fn peek_raw_at(&self, offset: usize, out: &mut [u8]) -> usize {
        let used = self.used();
        if offset >= used {
            return 0;
        }
        let n = (used - offset).min(out.len());
        let capacity = self.capacity();
        let mut pos = (self.tail + offset) % capacity;
        for slot in out.iter_mut().take(n) {
            *slot = self.buf[pos];
            pos = (pos + 1) % capacity;
        }
        n
    }

    /// Consumes up to `len` bytes without copying them anywhere.
    ///
    /// Returns the number of bytes actually skipped, clamped to `used()`.
    pub fn skip_raw(&mut self, len: usize) -> usize {
        let n = self.used().min(len);
        self.tail = (self.tail + n) % self.capacity();
        n
    }

    /// Resets the cursors and zeroes the buffer contents.
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.head = 0;
        self.tail = 0;
    }
}
