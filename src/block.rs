//! Fixed-capacity reusable block
//!
//! A [`Block`] is the unit of data transfer in the pipeline: a byte buffer
//! allocated once by the arena and recycled indefinitely. It never grows.
//! Ownership of a block moves through queues from stage to stage, so at any
//! instant exactly one queue or one stage holds it — the single-writer
//! discipline is enforced by the type system, not by a lock.
//!
//! A poisoned block is the shutdown token: it carries no data and tells the
//! stage that receives it to forward the poison and return.

use crate::arena::ArenaCounters;
use std::slice::{ChunksExact, ChunksExactMut};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A fixed-capacity byte buffer with a used length and a poison flag.
pub struct Block {
    data: Box<[u8]>,
    len: usize,
    poisoned: bool,
    counters: Arc<ArenaCounters>,
}

impl Block {
    /// Allocate a block of `capacity` bytes, accounted against `counters`.
    /// Only the arena creates blocks; the total population is fixed.
    pub(crate) fn new(capacity: usize, counters: Arc<ArenaCounters>) -> Self {
        let live = counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak.fetch_max(live, Ordering::SeqCst);
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
            poisoned: false,
            counters,
        }
    }

    /// Byte capacity. Fixed for the block's lifetime.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes currently in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the used region is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Set the used length. Panics if `len` exceeds the capacity — a stage
    /// claiming more bytes than the block holds is a contract violation.
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.data.len(),
            "used length {} exceeds block capacity {}",
            len,
            self.data.len()
        );
        self.len = len;
    }

    /// The used region of the buffer.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The used region of the buffer, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }

    /// The whole buffer regardless of used length, for stages that fill a
    /// block before calling [`set_len`](Self::set_len).
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Iterate over the used region as fixed-size entries.
    #[inline]
    pub fn entries(&self, entry_size: usize) -> ChunksExact<'_, u8> {
        self.as_slice().chunks_exact(entry_size)
    }

    /// Iterate mutably over the used region as fixed-size entries.
    #[inline]
    pub fn entries_mut(&mut self, entry_size: usize) -> ChunksExactMut<'_, u8> {
        self.as_mut_slice().chunks_exact_mut(entry_size)
    }

    /// Whether this block is the shutdown token.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Turn this block into the shutdown token. Its data is discarded.
    #[inline]
    pub fn poison(&mut self) {
        self.len = 0;
        self.poisoned = true;
    }

    /// Reset for reuse: empty, valid. Just resets bookkeeping — the buffer
    /// itself is not zeroed.
    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
        self.poisoned = false;
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("capacity", &self.data.len())
            .field("len", &self.len)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
