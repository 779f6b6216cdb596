//! The writer: the single consumer that assembles compressed blocks, in
//! sequence order, into one standards-conformant gzip member.
//!
//! Grounded in `original_source/parallel.c`'s `write_thread`: emit the
//! gzip header once, then pull jobs strictly in `seq` order from the
//! ordered queue, writing each block's compressed bytes, combining its
//! CRC-32 into a running whole-stream CRC, and accumulating the
//! uncompressed length, finishing with the trailer once the terminal
//! job (`more == false`) has been written.

use std::io::{self, Write};

use crate::crc::crc32_combine;
use crate::header::GzipHeaderBuilder;
use crate::options::Options;
use crate::queue::{OrderedJobQueue, QueueClosed};

/// Drain `write_queue` in strict sequence order, writing a complete gzip
/// member to `out`. Runs on its own OS thread.
///
/// Returns the number of uncompressed bytes written, mainly for tests;
/// callers that only want side effects can discard it.
pub fn run_writer<W: Write>(
    options: &Options,
    write_queue: &OrderedJobQueue,
    mut out: W,
) -> io::Result<u64> {
    out.write_all(&GzipHeaderBuilder::header(options))?;

    let mut seq = 0u64;
    let mut crc = 0u32;
    let mut ulen = 0u64;

    loop {
        let job = match write_queue.take(seq) {
            Ok(job) => job,
            Err(QueueClosed) => {
                // The terminal job (`more == false`) always exists for any
                // non-empty stream and is always written before the
                // queue's producers can all close; reaching a close here
                // with jobs still pending would mean the reader emitted no
                // terminal job at all, which is a contract violation in
                // the rest of the pipeline, not a condition this writer
                // can recover from.
                assert_eq!(seq, 0, "writer queue closed with jobs still pending");
                break;
            }
        };

        out.write_all(&job.output)?;
        crc = crc32_combine(crc, job.check, job.input.len() as u64);
        ulen += job.input.len() as u64;
        let more = job.more;
        seq += 1;
        if !more {
            break;
        }
    }

    out.write_all(&GzipHeaderBuilder::trailer(crc, ulen))?;
    out.flush()?;
    Ok(ulen)
}
