//! Chain orchestration
//!
//! A [`Chain`] owns everything the pipeline needs: the block arena, the
//! ordered list of bounded queues, and the worker threads. Stages are
//! appended in declaration order — each [`add`](Chain::add) (or
//! [`add_worker`](Chain::add_worker)) creates a new queue, wires the
//! previous queue as the stage's input and the new queue as its output,
//! and hands the stage a [`ChainPosition`] capability for exactly that
//! junction pair.
//!
//! [`complete_loop`](Chain::complete_loop) closes the topology by running
//! a [`Recycler`] from the last queue back to queue #0. From then on the
//! fixed block population circulates forever and the pipeline's memory
//! footprint is exactly `block_count * block_size_effective`, no matter
//! how much data flows through it.
//!
//! Appending a stage after `complete_loop` is a programming error and
//! panics; it is not a recoverable condition.

mod link;
mod recycler;
mod worker;

pub use link::Link;
pub use recycler::Recycler;
pub use worker::Worker;

use crate::arena::BlockArena;
use crate::block::Block;
use crate::config::ChainConfig;
use crate::error::Result;
use crate::queue::{BlockQueue, BlockReceiver, BlockSender};
use worker::WorkerThread;

/// Capability token granting one stage access to its input and output
/// queues. Created by [`Chain::add`] and consumed by a [`Link`] or a
/// [`Worker`]; the endpoints stay usable even if they outlive the chain,
/// degrading to end-of-stream instead of dangling.
pub struct ChainPosition {
    pub(crate) input: BlockReceiver,
    pub(crate) output: BlockSender,
    entry_size: usize,
    block_size: usize,
}

impl ChainPosition {
    /// Entry size of the owning chain.
    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    /// Effective block size of the owning chain.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Pop the next block from the input queue, blocking while it is
    /// empty. `None` means the chain is gone (end-of-stream).
    pub fn pop(&self) -> Option<Block> {
        self.input.recv()
    }

    /// Push a block to the output queue, blocking while it is full.
    /// Returns `false` if the chain is gone.
    pub fn push(&self, block: Block) -> bool {
        self.output.send(block)
    }
}

/// The pipeline orchestrator. See the module docs for the topology model.
pub struct Chain {
    config: ChainConfig,
    arena: BlockArena,
    // Declared before the queues so drop joins every worker before any
    // queue (and the blocks inside it) is torn down.
    threads: Vec<WorkerThread>,
    queues: Vec<BlockQueue>,
    finalized: bool,
}

impl Chain {
    /// Validate `config`, allocate the full block population, and seed
    /// queue #0 with every block marked empty. This is the first stage's
    /// free-block supply; no thread exists yet.
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.validate()?;
        let arena = BlockArena::new(&config);

        // Queue #0 must admit the whole population for seeding, and the
        // recycler feeds back into it once the loop is closed.
        let first = BlockQueue::new(config.queue_length.max(config.block_count));
        for block in arena.carve() {
            first.push(block);
        }

        tracing::info!(
            block_count = config.block_count,
            block_size = arena.block_size(),
            queue_length = config.queue_length,
            total_bytes = arena.total_bytes(),
            "chain constructed"
        );

        Ok(Self {
            config,
            arena,
            threads: Vec::new(),
            queues: vec![first],
            finalized: false,
        })
    }

    /// The configuration this chain was built from.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Bytes per logical record.
    pub fn entry_size(&self) -> usize {
        self.config.entry_size
    }

    /// Effective bytes per block (rounded up to a whole number of entries).
    pub fn block_size(&self) -> usize {
        self.arena.block_size()
    }

    /// The block arena, for population accounting.
    pub fn arena(&self) -> &BlockArena {
        &self.arena
    }

    /// Blocks currently resident across all queues. The remainder of the
    /// population is held by stages.
    pub fn resident_blocks(&self) -> usize {
        self.queues.iter().map(BlockQueue::len).sum()
    }

    /// Append a stage position: creates a new queue of capacity
    /// `queue_length`, with the most recently created queue as input and
    /// the new queue as output.
    ///
    /// Panics if the chain is finalized.
    pub fn add(&mut self) -> ChainPosition {
        assert!(!self.finalized, "cannot add a stage to a finalized chain");
        let queue = BlockQueue::new(self.config.queue_length);
        let input = self
            .queues
            .last()
            .expect("chain always has queue #0")
            .receiver();
        let position = ChainPosition {
            input,
            output: queue.sender(),
            entry_size: self.config.entry_size,
            block_size: self.arena.block_size(),
        };
        self.queues.push(queue);
        tracing::debug!(queues = self.queues.len(), "stage position added");
        position
    }

    /// Append a threaded worker stage. Internally calls [`add`](Self::add)
    /// and spawns the worker on its own thread; returns the chain so
    /// stages can be attached in declaration order:
    ///
    /// ```ignore
    /// let mut chain = Chain::new(config)?
    ///     .add_worker(parse_stage)
    ///     .add_worker(transform_stage);
    /// chain.complete_loop();
    /// ```
    ///
    /// Panics if the chain is finalized.
    pub fn add_worker<W: Worker>(mut self, worker: W) -> Self {
        let position = self.add();
        self.threads.push(WorkerThread::spawn(position, worker));
        tracing::debug!(workers = self.threads.len(), "worker stage attached");
        self
    }

    /// Finalize the topology: spawn a [`Recycler`] consuming the last
    /// queue and producing into queue #0, closing the pipeline into a
    /// ring. No stage may be appended afterwards.
    ///
    /// Panics if called twice.
    pub fn complete_loop(&mut self) {
        assert!(!self.finalized, "complete_loop called twice");
        self.finalized = true;

        let input = self
            .queues
            .last()
            .expect("chain always has queue #0")
            .receiver();
        let output = self.queues[0].sender();
        let position = ChainPosition {
            input,
            output,
            entry_size: self.config.entry_size,
            block_size: self.arena.block_size(),
        };
        self.threads.push(WorkerThread::spawn(position, Recycler));

        tracing::info!(
            queues = self.queues.len(),
            workers = self.threads.len(),
            "chain loop completed"
        );
    }

    /// Whether [`complete_loop`](Self::complete_loop) has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        // Field order does the work: `threads` drops first and joins every
        // worker, then the queues drop and free resident blocks. A chain
        // that never closed its loop still tears down leak-free.
        tracing::debug!(workers = self.threads.len(), "chain shutting down");
    }
}
