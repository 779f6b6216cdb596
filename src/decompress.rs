//! Decompression: thin ambient I/O plumbing, not a hand-rolled inflate
//! implementation.
//!
//! The reference implementation ships a single-threaded inflate path
//! (`original_source/unzip.c`, `inflate.c`) used for `-d`/`-t`; this
//! crate's hard-engineering scope is the parallel compressor, so
//! decompression here is delegated entirely to
//! [`flate2::read::MultiGzDecoder`], which also transparently handles
//! multi-member gzip streams (this crate's own output is always a
//! single member, but a conforming reader should accept concatenated
//! ones too).

use std::io::{self, Read, Write};

use flate2::read::MultiGzDecoder;

/// Decompress a complete gzip stream from `input`, writing the
/// recovered bytes to `output`. Used by the CLI's `-d` flag and as the
/// independent oracle in this crate's round-trip tests.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> io::Result<u64> {
    let mut decoder = MultiGzDecoder::new(input);
    let n = io::copy(&mut decoder, &mut output)?;
    Ok(n)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::compress;
    use crate::options::Options;

    #[test]
    fn decompresses_what_compress_produced() {
        let data = b"round trip through the public decompress() helper. ".repeat(40);
        let options = Options::builder().build();
        let mut compressed = Vec::new();
        compress(&options, &data[..], &mut compressed).unwrap();

        let mut out = Vec::new();
        let n = decompress(&compressed[..], &mut out).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(out, data);
    }
}
