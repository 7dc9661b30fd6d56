//! Caller-thread pipeline cursor
//!
//! A [`Link`] lets the calling thread act as a stage without spawning a
//! worker: the program's own feeder and drainer code sit at a chain
//! position and step through blocks with [`advance`](Link::advance).
//!
//! The poison protocol is handled here. When a link observes a poisoned
//! block it forwards that single token downstream and becomes invalid;
//! when the caller ends the stream early it calls [`poison`](Link::poison).
//! Either way exactly one token leaves per token (or decision) that
//! arrived, which is what keeps every downstream stage joinable.

use super::ChainPosition;
use crate::block::Block;
use crate::queue::{BlockReceiver, BlockSender};

/// A synchronous cursor over one chain position.
pub struct Link {
    current: Option<Block>,
    input: BlockReceiver,
    output: BlockSender,
    poisoned: bool,
    entry_size: usize,
}

impl Link {
    /// Bind to a position and pop the first block from the input queue.
    /// Blocks until one is available.
    pub fn new(position: ChainPosition) -> Self {
        let entry_size = position.entry_size();
        let mut link = Self {
            current: None,
            input: position.input,
            output: position.output,
            poisoned: false,
            entry_size,
        };
        link.fetch();
        link
    }

    /// Pop the next block into `current`, handling poison and disconnect.
    fn fetch(&mut self) {
        match self.input.recv() {
            Some(block) if block.is_poisoned() => {
                // One poison token in, one out.
                self.output.send(block);
                self.poisoned = true;
            }
            Some(block) => self.current = Some(block),
            None => {
                // Chain gone; nothing to forward.
                self.poisoned = true;
            }
        }
    }

    /// True while `current` holds a valid block. False signals
    /// end-of-stream; the caller must stop advancing.
    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// Entry size of the owning chain, for record-wise block access.
    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    /// The current block. Panics if the link has ended.
    pub fn block(&self) -> &Block {
        self.current.as_ref().expect("link has ended")
    }

    /// The current block, mutable. Panics if the link has ended.
    pub fn block_mut(&mut self) -> &mut Block {
        self.current.as_mut().expect("link has ended")
    }

    /// Commit `current` downstream and pop the next block. Panics if the
    /// link has already ended — callers must check
    /// [`is_valid`](Self::is_valid) first.
    pub fn advance(&mut self) {
        assert!(!self.poisoned, "advanced a link past end-of-stream");
        let block = self.current.take().expect("link has ended");
        self.output.send(block);
        self.fetch();
    }

    /// End the stream from this position: mark the current block as the
    /// poison token and push it downstream. The link is invalid afterwards.
    pub fn poison(&mut self) {
        assert!(!self.poisoned, "link poisoned twice");
        if let Some(mut block) = self.current.take() {
            block.poison();
            self.output.send(block);
        }
        self.poisoned = true;
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        // A caller that walks away mid-stream still owes downstream its
        // termination token.
        if !self.poisoned {
            if let Some(mut block) = self.current.take() {
                block.poison();
                self.output.send(block);
            }
            self.poisoned = true;
        }
    }
}
