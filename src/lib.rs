//! # blockflow: Bounded-Memory Streaming Pipeline
//!
//! A pipeline of processing stages connected by blocking, fixed-capacity
//! queues that pass fixed-size reusable buffers ("blocks") from stage to
//! stage. The total number and size of in-flight buffers is fixed at
//! construction and recirculated through a closed loop, so a program can
//! process data volumes far larger than memory with a footprint of exactly
//! `block_count * block_size_effective` bytes.
//!
//! ## Architecture
//!
//! - **Chain**: owns the block arena, the ordered queues, and the worker
//!   threads; stages are appended in declaration order
//! - **Workers**: one OS thread per attached stage, driven by a
//!   [`ChainPosition`] capability token; joined on chain drop
//! - **Links**: caller-thread cursors for the program's own feeder and
//!   drainer code
//! - **Communication**: bounded crossbeam channels — a full queue blocks
//!   its producer, which is the backpressure that bounds memory
//! - **Shutdown**: cooperative, via the poison token; one token in means
//!   one token out at every stage, so every thread becomes joinable
//!
//! ## Example
//!
//! ```
//! use blockflow::{Chain, ChainConfig, ChainPosition, Link};
//!
//! # fn main() -> blockflow::Result<()> {
//! let config = ChainConfig {
//!     entry_size: 4,
//!     block_size: 16,
//!     block_count: 2,
//!     queue_length: 1,
//! };
//!
//! // Wire the whole topology before binding any Link: binding pops a
//! // block, so the drainer must not bind until data is flowing.
//! let mut chain = Chain::new(config)?;
//! let feeder_pos = chain.add();
//!
//! // A worker stage that increments every 4-byte entry.
//! let mut chain = chain.add_worker(|position: ChainPosition| {
//!     let mut link = Link::new(position);
//!     while link.is_valid() {
//!         for entry in link.block_mut().entries_mut(4) {
//!             let v = u32::from_le_bytes((&*entry).try_into().unwrap());
//!             entry.copy_from_slice(&(v + 1).to_le_bytes());
//!         }
//!         link.advance();
//!     }
//! });
//!
//! let drainer_pos = chain.add();
//! chain.complete_loop();
//!
//! // Feed one block of entries [1, 2, 3, 4], then end the stream.
//! let mut feeder = Link::new(feeder_pos);
//! let block = feeder.block_mut();
//! for (i, entry) in block.buffer_mut().chunks_exact_mut(4).enumerate() {
//!     entry.copy_from_slice(&(i as u32 + 1).to_le_bytes());
//! }
//! block.set_len(16);
//! feeder.advance();
//! feeder.poison();
//!
//! // Drain: the block now reads [2, 3, 4, 5].
//! let mut drainer = Link::new(drainer_pos);
//! let mut seen = Vec::new();
//! while drainer.is_valid() {
//!     for entry in drainer.block().entries(4) {
//!         seen.push(u32::from_le_bytes(entry.try_into().unwrap()));
//!     }
//!     drainer.advance();
//! }
//! assert_eq!(seen, vec![2, 3, 4, 5]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod block;
pub mod chain;
pub mod config;
pub mod error;
pub mod queue;

// Re-export commonly used types
pub use arena::BlockArena;
pub use block::Block;
pub use chain::{Chain, ChainPosition, Link, Recycler, Worker};
pub use config::ChainConfig;
pub use error::{ChainError, Result};
pub use queue::{BlockQueue, BlockReceiver, BlockSender};
