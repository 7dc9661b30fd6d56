//! Block arena
//!
//! All blocks are allocated here, once, at chain construction. The arena
//! keeps live/peak counters so the fixed-population invariant is
//! observable: `live()` equals the configured block count from construction
//! until the chain is dropped, and `peak()` never exceeds it no matter how
//! much data flows through the pipeline.

use crate::block::Block;
use crate::config::ChainConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared accounting for the block population.
#[derive(Debug, Default)]
pub(crate) struct ArenaCounters {
    /// Blocks currently alive (anywhere: queues, stages, links).
    pub(crate) live: AtomicUsize,
    /// High-water mark of simultaneously alive blocks.
    pub(crate) peak: AtomicUsize,
}

/// Allocates the chain's fixed block population and tracks it.
pub struct BlockArena {
    block_size: usize,
    block_count: usize,
    counters: Arc<ArenaCounters>,
}

impl BlockArena {
    /// Create an arena sized by `config`. No allocation happens until
    /// [`carve`](Self::carve).
    pub(crate) fn new(config: &ChainConfig) -> Self {
        Self {
            block_size: config.block_size_effective(),
            block_count: config.block_count,
            counters: Arc::new(ArenaCounters::default()),
        }
    }

    /// Allocate the full block population: `block_count` blocks of
    /// `block_size` bytes, all empty and valid.
    pub(crate) fn carve(&self) -> Vec<Block> {
        (0..self.block_count)
            .map(|_| Block::new(self.block_size, self.counters.clone()))
            .collect()
    }

    /// Effective bytes per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Fixed total footprint in bytes.
    pub fn total_bytes(&self) -> usize {
        self.block_size * self.block_count
    }

    /// Blocks currently alive.
    pub fn live(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// High-water mark of simultaneously alive blocks.
    pub fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for BlockArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockArena")
            .field("block_size", &self.block_size)
            .field("block_count", &self.block_count)
            .field("live", &self.live())
            .field("peak", &self.peak())
            .finish()
    }
}
