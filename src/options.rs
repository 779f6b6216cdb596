//! Explicit, immutable pipeline configuration.
//!
//! The reference implementation threads a process-wide `g` struct of CLI
//! flags through every function. Here that global is replaced by an
//! [`Options`] value built once via [`OptionsBuilder`] and shared (by
//! `Arc`, through cheap `Clone`) with the reader, every compression worker,
//! and the writer.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{PigzError, PigzResult};

/// Default block size: 128 KiB, matching pigz's own default and the
/// recommendation in the component design that blocks stay >= 128 KiB for
/// good ratio.
pub const DEFAULT_BLOCK_SIZE: usize = 128 * 1024;

/// Default compression level, matching gzip/pigz's own default.
pub const DEFAULT_LEVEL: u8 = 6;

/// Immutable configuration for one run of the pipeline.
///
/// Cheap to clone: the only heap allocation is the optional original
/// filename, held behind an `Arc<str>` so every worker can share it
/// without copying.
#[derive(Debug, Clone)]
pub struct Options {
    pub(crate) level: u8,
    pub(crate) block_size: usize,
    pub(crate) workers: usize,
    pub(crate) name: Option<Arc<str>>,
    pub(crate) mtime: u32,
}

impl Options {
    /// Start building an [`Options`] with pigz-compatible defaults:
    /// level 6, 128 KiB blocks, one worker per available core, no
    /// embedded name, and the current time as mtime.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mtime(&self) -> u32 {
        self.mtime
    }

    /// `xflags` byte per the gzip header table: 2 for level 9, 4 for level
    /// 1, 0 otherwise.
    pub(crate) fn xflags(&self) -> u8 {
        if self.level >= 9 {
            2
        } else if self.level == 1 {
            4
        } else {
            0
        }
    }
}

/// Builder for [`Options`]. Mirrors the validate-as-you-go style of
/// `pooled_writer::PoolBuilder`: each setter can fail fast with a
/// [`PigzError`] contract violation rather than deferring the check to
/// first use inside a worker thread.
pub struct OptionsBuilder {
    level: u8,
    block_size: usize,
    workers: usize,
    name: Option<Arc<str>>,
    mtime: u32,
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        let mtime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        Self {
            level: DEFAULT_LEVEL,
            block_size: DEFAULT_BLOCK_SIZE,
            workers: num_cpus::get().max(1),
            name: None,
            mtime,
        }
    }
}

impl OptionsBuilder {
    /// Set the compression level. Must be in `1..=9`; level 0 ("store") is
    /// a single-threaded-path concept that the parallel core does not
    /// accept.
    pub fn level(mut self, level: u8) -> PigzResult<Self> {
        if !(1..=9).contains(&level) {
            return Err(PigzError::InvalidLevel(level));
        }
        self.level = level;
        Ok(self)
    }

    /// Set the block size in bytes. Must be strictly positive; values
    /// below 64 KiB are accepted but the component design notes that
    /// dictionary overhead begins to dominate ratio below that point.
    pub fn block_size(mut self, block_size: usize) -> PigzResult<Self> {
        if block_size == 0 {
            return Err(PigzError::InvalidBlockSize);
        }
        self.block_size = block_size;
        Ok(self)
    }

    /// Set the number of compression worker threads. Must be >= 1.
    pub fn workers(mut self, workers: usize) -> PigzResult<Self> {
        if workers == 0 {
            return Err(PigzError::InvalidWorkerCount);
        }
        self.workers = workers;
        Ok(self)
    }

    /// Embed an original filename in the gzip header (sets the FNAME flag
    /// bit and writes a NUL-terminated name after the fixed header).
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the mtime field (little-endian Unix seconds). Defaults to
    /// the current time.
    pub fn mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    /// Consume the builder and produce an [`Options`] value.
    pub fn build(self) -> Options {
        Options {
            level: self.level,
            block_size: self.block_size,
            workers: self.workers,
            name: self.name,
            mtime: self.mtime,
        }
    }
}
