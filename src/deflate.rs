//! The per-worker DEFLATE engine: a thin, block-oriented wrapper around
//! [`flate2::Compress`] configured for *raw* deflate (no zlib or gzip
//! wrapper -- the writer emits the gzip wrapper itself).
//!
//! Grounded in `original_source/parallel.c`'s `compress_thread`: one
//! `z_stream` per thread, `deflateInit2(..., windowBits = -15, ...)` for a
//! raw stream, reused across jobs via `deflateReset`, primed per-job with
//! `deflateSetDictionary`, and driven with `Z_SYNC_FLUSH` / `Z_FINISH`.

use flate2::{Compress, CompressError, Compression, FlushCompress, Status};

/// One worker's reusable encoder state. Constructing this allocates the
/// codec's internal window once; every subsequent job reuses it via
/// [`DeflateEngine::reset`], avoiding a per-block allocation of that
/// state.
pub struct DeflateEngine {
    compress: Compress,
}

impl DeflateEngine {
    /// Create a new engine at the given level (1..=9), producing raw
    /// deflate output with no header/trailer of its own.
    pub fn new(level: u8) -> Self {
        Self { compress: Compress::new(Compression::new(level as u32), false) }
    }

    /// Reset the encoder to a fresh state so it can start a new,
    /// independent block. The compression level is fixed for the
    /// lifetime of a run (see [`crate::Options`]), so there is nothing
    /// else to reapply here.
    pub fn reset(&mut self) {
        self.compress.reset();
    }

    /// Prime the encoder's match search with up to 32 KiB of dictionary
    /// bytes from the previous block, so that the freshly reset stream
    /// can still emit legal back-references into data it will never see
    /// directly.
    pub fn set_dictionary(&mut self, dict: &[u8]) {
        // A reset encoder always accepts a dictionary; this is a
        // programming error in this crate if it ever fails, not a
        // recoverable condition (the dictionary is always <= 32 KiB).
        self.compress
            .set_dictionary(dict)
            .expect("set_dictionary after reset should never fail");
    }

    /// Compress `input` into `output`, appending rather than overwriting
    /// any existing contents of `output`. `finish` selects `Z_FINISH`
    /// (emit the deflate end-of-stream marker, used only for the
    /// terminal block) vs. `Z_SYNC_FLUSH` (flush to a byte boundary
    /// without ending the stream, so that this block's output can be
    /// concatenated with the next).
    pub fn compress_block(
        &mut self,
        input: &[u8],
        output: &mut Vec<u8>,
        finish: bool,
    ) -> Result<(), CompressError> {
        let flush = if finish { FlushCompress::Finish } else { FlushCompress::Sync };
        let before_in = self.compress.total_in();
        let target_in = before_in + input.len() as u64;

        // `compress_vec` only ever writes into `output`'s *existing* spare
        // capacity; it does not grow the `Vec` itself. Keep topping up
        // capacity and re-calling until the stream-end marker has actually
        // been emitted (`finish`), or, for a sync flush, until a call both
        // consumes the whole block and leaves spare output capacity behind
        // -- that's the only reliable sign the flush itself was fully
        // drained, not just that the input side is empty. Stopping as soon
        // as input is consumed is not enough: a call can return having
        // filled `output` to capacity with more flush output still
        // pending, in which case it must be called again with room to
        // write before the block is actually complete.
        output.reserve(input.len() + 64);
        loop {
            if output.len() == output.capacity() {
                output.reserve(4096);
            }
            let consumed = (self.compress.total_in() - before_in) as usize;
            let status = self.compress.compress_vec(&input[consumed..], output, flush)?;
            if status == Status::StreamEnd {
                break;
            }
            if finish {
                continue;
            }
            let consumed_all = self.compress.total_in() >= target_in;
            let drained = output.len() < output.capacity();
            if consumed_all && drained {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_raw_inflate() {
        let mut engine = DeflateEngine::new(6);
        let mut out = Vec::new();
        let input = b"hello hello hello hello world".repeat(20);
        engine.compress_block(&input, &mut out, true).unwrap();

        let mut decompress = flate2::Decompress::new(false);
        let mut round_tripped = vec![0u8; input.len() * 2];
        decompress
            .decompress(&out, &mut round_tripped, flate2::FlushDecompress::Finish)
            .unwrap();
        let n = decompress.total_out() as usize;
        assert_eq!(&round_tripped[..n], &input[..]);
    }

    #[test]
    fn sync_flush_drains_large_incompressible_blocks() {
        // A large, incompressible non-terminal block compresses to output
        // close to its own input size (well past the loop's initial
        // `input.len() + 64` reservation), which used to let the sync-flush
        // loop exit one call before the flush was actually fully drained,
        // silently truncating the block. Exercise that boundary directly.
        let mut engine = DeflateEngine::new(6);
        let mut seed = 0x2545_f491_4f6c_dd1du64;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        let mut a = vec![0u8; 900 * 1024];
        for chunk in a.chunks_mut(8) {
            let bytes = next().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
        let b = b"small terminal block".to_vec();

        let mut combined = Vec::new();
        engine.compress_block(&a, &mut combined, false).unwrap();
        engine.reset();
        engine.set_dictionary(&a[a.len() - 32 * 1024..]);
        engine.compress_block(&b, &mut combined, true).unwrap();

        let mut decompress = flate2::Decompress::new(false);
        let mut out = vec![0u8; a.len() + b.len() + 64];
        decompress
            .decompress(&combined, &mut out, flate2::FlushDecompress::Finish)
            .unwrap();
        let n = decompress.total_out() as usize;
        let mut expected = a.clone();
        expected.extend_from_slice(&b);
        assert_eq!(&out[..n], &expected[..]);
    }

    #[test]
    fn sync_flush_blocks_concatenate() {
        let mut engine = DeflateEngine::new(6);
        let a = b"first block of data, repeated. ".repeat(50);
        let b = b"second block of data, repeated. ".repeat(50);

        let mut combined = Vec::new();
        engine.compress_block(&a, &mut combined, false).unwrap();
        engine.reset();
        engine.set_dictionary(&a[a.len() - 1024..]);
        engine.compress_block(&b, &mut combined, true).unwrap();

        // No dictionary call is needed on the decompress side: a single
        // continuous inflate pass builds its own sliding window from the
        // bytes it has already decoded, so by the time it reaches block
        // b's back-references into block a, those bytes are already in
        // its window. The encoder-side dictionary priming exists only to
        // give each block's independently-reset encoder state the window
        // it would otherwise be missing.
        let mut decompress = flate2::Decompress::new(false);
        let mut out = vec![0u8; a.len() + b.len() + 64];
        decompress
            .decompress(&combined, &mut out, flate2::FlushDecompress::Finish)
            .unwrap();
        let n = decompress.total_out() as usize;
        let mut expected = a.clone();
        expected.extend_from_slice(&b);
        assert_eq!(&out[..n], &expected[..]);
    }
}
