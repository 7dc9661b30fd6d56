//! Block recycler
//!
//! The built-in terminal stage that closes the pipeline into a ring: every
//! block it receives is reset to empty and pushed to its output queue,
//! which [`Chain::complete_loop`](crate::Chain::complete_loop) wires back
//! to queue #0. A poisoned block is forwarded as-is, terminating the loop
//! rather than resurrecting a dead block.

use super::worker::Worker;
use super::ChainPosition;

/// Stateless recycling worker. Holds no data, so a single value can be
/// shared across chains and threads freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recycler;

impl Worker for Recycler {
    fn run(self, position: ChainPosition) {
        while let Some(mut block) = position.pop() {
            if block.is_poisoned() {
                position.push(block);
                tracing::trace!("recycler observed poison, loop terminated");
                return;
            }
            block.reset();
            if !position.push(block) {
                return;
            }
        }
    }
}
