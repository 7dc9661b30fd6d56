//! Shared helpers for blockflow integration tests.

#![allow(dead_code)]

use blockflow::{Block, ChainConfig, ChainPosition, Link};
use std::sync::mpsc;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Initialize tracing once for the whole test binary. Controlled by
/// `RUST_LOG`; silent by default.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A config over 4-byte entries, the shape most tests use.
pub fn u32_config(block_size: usize, block_count: usize, queue_length: usize) -> ChainConfig {
    ChainConfig {
        entry_size: 4,
        block_size,
        block_count,
        queue_length,
    }
}

/// Fill a block with little-endian u32 entries.
pub fn write_u32_entries(block: &mut Block, values: &[u32]) {
    let needed = values.len() * 4;
    assert!(needed <= block.capacity(), "values do not fit in block");
    for (entry, value) in block.buffer_mut().chunks_exact_mut(4).zip(values) {
        entry.copy_from_slice(&value.to_le_bytes());
    }
    block.set_len(needed);
}

/// Read a block's used region as little-endian u32 entries.
pub fn read_u32_entries(block: &Block) -> Vec<u32> {
    block
        .entries(4)
        .map(|entry| u32::from_le_bytes(entry.try_into().unwrap()))
        .collect()
}

/// Worker that forwards every block unchanged.
pub fn passthrough(position: ChainPosition) {
    let mut link = Link::new(position);
    while link.is_valid() {
        link.advance();
    }
}

/// Worker that adds one to every u32 entry it sees.
pub fn increment(position: ChainPosition) {
    let mut link = Link::new(position);
    while link.is_valid() {
        for entry in link.block_mut().entries_mut(4) {
            let v = u32::from_le_bytes((&*entry).try_into().unwrap());
            entry.copy_from_slice(&(v + 1).to_le_bytes());
        }
        link.advance();
    }
}

/// Build a draining worker that reports every u32 entry it sees on `tx`,
/// in arrival order. The channel closes when the stream ends.
pub fn collector(tx: mpsc::Sender<u32>) -> impl FnOnce(ChainPosition) + Send + 'static {
    move |position: ChainPosition| {
        let mut link = Link::new(position);
        while link.is_valid() {
            for value in read_u32_entries(link.block()) {
                if tx.send(value).is_err() {
                    return;
                }
            }
            link.advance();
        }
    }
}
