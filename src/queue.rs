//! Bounded blocking queue of blocks
//!
//! Thin adapter over a bounded crossbeam channel. `push` blocks the caller
//! while the queue is full and `pop` blocks while it is empty — these are
//! the pipeline's only suspension points, and a full queue blocking its
//! producer is exactly the backpressure that bounds memory.
//!
//! The channel endpoints are cloneable, so a
//! [`ChainPosition`](crate::ChainPosition) can carry one input and one
//! output endpoint into another thread while the chain keeps the queue
//! itself alive.

use crate::block::Block;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

/// A fixed-capacity FIFO junction between two stages.
pub struct BlockQueue {
    tx: Sender<Block>,
    rx: Receiver<Block>,
    capacity: usize,
}

impl BlockQueue {
    /// Create a queue holding at most `capacity` blocks.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// The fixed capacity set at creation.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of blocks currently resident.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is empty right now.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Push a block, blocking while the queue is full.
    pub fn push(&self, block: Block) {
        // The queue owns its receiver, so the channel cannot disconnect.
        let _ = self.tx.send(block);
    }

    /// Pop a block, blocking while the queue is empty.
    pub fn pop(&self) -> Block {
        match self.rx.recv() {
            Ok(block) => block,
            // Unreachable for the same reason push cannot fail.
            Err(_) => unreachable!("queue sender dropped while queue alive"),
        }
    }

    /// Push without blocking. Returns the block back if the queue is full.
    pub fn try_push(&self, block: Block) -> Result<(), Block> {
        match self.tx.try_send(block) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(block)) => Err(block),
            Err(TrySendError::Disconnected(block)) => Err(block),
        }
    }

    /// Pop without blocking. Returns `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<Block> {
        match self.rx.try_recv() {
            Ok(block) => Some(block),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// A producer endpoint for this queue.
    pub(crate) fn sender(&self) -> BlockSender {
        BlockSender(self.tx.clone())
    }

    /// A consumer endpoint for this queue.
    pub(crate) fn receiver(&self) -> BlockReceiver {
        BlockReceiver(self.rx.clone())
    }
}

/// Producer endpoint handed to a stage through its position token.
#[derive(Clone)]
pub struct BlockSender(Sender<Block>);

impl BlockSender {
    /// Send a block downstream, blocking while the queue is full.
    ///
    /// Returns `false` if the chain (and with it the queue) is gone; the
    /// block is dropped and its memory reclaimed through the arena
    /// accounting.
    pub fn send(&self, block: Block) -> bool {
        self.0.send(block).is_ok()
    }
}

/// Consumer endpoint handed to a stage through its position token.
#[derive(Clone)]
pub struct BlockReceiver(Receiver<Block>);

impl BlockReceiver {
    /// Receive the next block, blocking while the queue is empty.
    ///
    /// Returns `None` if the chain is gone — treated as end-of-stream.
    pub fn recv(&self) -> Option<Block> {
        self.0.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::BlockArena;
    use crate::config::ChainConfig;

    fn blocks(count: usize) -> Vec<Block> {
        let config = ChainConfig {
            entry_size: 1,
            block_size: 8,
            block_count: count,
            queue_length: 1,
        };
        BlockArena::new(&config).carve()
    }

    #[test]
    fn test_capacity_bounds_pushes() {
        let queue = BlockQueue::new(2);
        let mut supply = blocks(3);

        assert!(queue.try_push(supply.pop().unwrap()).is_ok());
        assert!(queue.try_push(supply.pop().unwrap()).is_ok());
        // Third push must fail: the queue is at capacity.
        let rejected = queue.try_push(supply.pop().unwrap());
        assert!(rejected.is_err());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_fifo_order() {
        let queue = BlockQueue::new(4);
        for (i, mut block) in blocks(4).into_iter().enumerate() {
            block.buffer_mut()[0] = i as u8;
            block.set_len(1);
            queue.push(block);
        }
        for i in 0..4 {
            assert_eq!(queue.pop().as_slice()[0], i as u8);
        }
    }

    #[test]
    fn test_cross_thread_blocking_pop() {
        let queue = std::sync::Arc::new(BlockQueue::new(1));
        let consumer = {
            let queue = queue.clone();
            std::thread::spawn(move || queue.pop().as_slice()[0])
        };
        let mut block = blocks(1).pop().unwrap();
        block.buffer_mut()[0] = 42;
        block.set_len(1);
        queue.push(block);
        assert_eq!(consumer.join().unwrap(), 42);
    }

    #[test]
    fn test_recv_after_queue_drop_is_end_of_stream() {
        let queue = BlockQueue::new(1);
        let rx = queue.receiver();
        drop(queue);
        assert!(rx.recv().is_none());
    }

    #[test]
    fn test_send_after_queue_drop_fails() {
        let queue = BlockQueue::new(1);
        let tx = queue.sender();
        drop(queue);
        assert!(!tx.send(blocks(1).pop().unwrap()));
    }
}
