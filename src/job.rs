//! A job: one block of work flowing reader -> worker -> writer.

use crate::pool::PoolBuf;

/// Size of the sliding-dictionary window handed from one block to the
/// next: the trailing 32 KiB of the previous block's uncompressed input.
pub const DICT_SIZE: usize = 32 * 1024;

/// Output pool buffer size for a given block size: `block_size` plus the
/// worst-case DEFLATE expansion of incompressible input, per the
/// component design's "output pool (>= block_size + overhead)". Mirrors
/// zlib's own `deflateBound` formula so a block essentially never needs
/// to grow its output buffer past this nominal capacity.
pub fn output_buffer_size(block_size: usize) -> usize {
    block_size + (block_size >> 12) + (block_size >> 14) + (block_size >> 25) + 13
}

/// One block of work.
///
/// `seq` is assigned by the reader starting at 0 and is unique across a
/// run; exactly one job has `more == false` (the terminal block).
pub struct Job {
    /// Monotonically increasing sequence number, assigned by the reader.
    pub seq: u64,
    /// False only on the terminal job.
    pub more: bool,
    /// Raw input bytes for this block, owned until the worker has
    /// checksummed it.
    pub input: PoolBuf,
    /// The trailing 32 KiB of the *previous* block's input, or `None` for
    /// block 0 or when dictionary continuity does not apply.
    pub dict: Option<PoolBuf>,
    /// CRC-32 of `input`, filled in by the compression worker.
    pub check: u32,
    /// Deflate output for this block, filled in by the compression
    /// worker. Backed by a space from the output pool, empty until
    /// compressed, and returned to that pool once the writer has written
    /// it out.
    pub output: PoolBuf,
}

impl Job {
    /// Allocate a new job carrying `seq`, backed by a fresh input space
    /// from the input pool and a fresh output space from the output pool.
    pub fn new(seq: u64, input: PoolBuf, output: PoolBuf) -> Self {
        Self { seq, more: true, input, dict: None, check: 0, output }
    }
}
