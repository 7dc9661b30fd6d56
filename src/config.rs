//! Chain configuration
//!
//! A [`ChainConfig`] fixes, up front, every byte the pipeline will ever use:
//! `block_count` blocks of `block_size_effective()` bytes each, circulating
//! through queues of capacity `queue_length`. The config can be built in
//! code or loaded from a TOML file.
//!
//! # Example
//!
//! ```
//! use blockflow::ChainConfig;
//!
//! let config = ChainConfig {
//!     entry_size: 8,
//!     block_size: 1 << 20,
//!     block_count: 4,
//!     queue_length: 2,
//! };
//! config.validate().unwrap();
//! assert_eq!(config.block_size_effective() % config.entry_size, 0);
//! ```

use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`Chain`](crate::Chain).
///
/// All four fields must be non-zero except `block_size`, which is rounded
/// up to at least one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Bytes per logical record. Block sizes are rounded up to a multiple
    /// of this.
    pub entry_size: usize,

    /// Requested bytes per block. The effective size is the smallest
    /// multiple of `entry_size` that is at least this large.
    pub block_size: usize,

    /// Total number of blocks ever allocated.
    pub block_count: usize,

    /// Capacity of every inter-stage queue.
    pub queue_length: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            entry_size: 8,
            block_size: 1 << 20,
            block_count: 4,
            queue_length: 2,
        }
    }
}

impl ChainConfig {
    /// Validate the configuration. Called by `Chain::new` before any
    /// allocation or thread spawn.
    pub fn validate(&self) -> Result<()> {
        if self.entry_size == 0 {
            return Err(ChainError::Config("entry_size must be non-zero".into()));
        }
        if self.block_count == 0 {
            return Err(ChainError::Config("block_count must be non-zero".into()));
        }
        if self.queue_length == 0 {
            return Err(ChainError::Config("queue_length must be non-zero".into()));
        }
        Ok(())
    }

    /// Requested block size rounded up to the nearest multiple of
    /// `entry_size`. A zero request still yields one entry's worth.
    pub fn block_size_effective(&self) -> usize {
        let entries = self.block_size.div_ceil(self.entry_size).max(1);
        entries * self.entry_size
    }

    /// Number of entries that fit in one block.
    pub fn entries_per_block(&self) -> usize {
        self.block_size_effective() / self.entry_size
    }

    /// Total fixed memory footprint of the pipeline in bytes.
    pub fn total_bytes(&self) -> usize {
        self.block_count * self.block_size_effective()
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ChainConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
