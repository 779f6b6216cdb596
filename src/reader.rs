//! The reader/partitioner: the main-thread producer that turns an input
//! stream into a strict sequence of [`Job`]s, each carrying a
//! `block_size`-bounded chunk of input plus the preceding block's 32 KiB
//! suffix as a dictionary.
//!
//! Grounded in `original_source/parallel.c`'s reader loop (embedded in
//! `main`/`process` in the fuller pigz sources) and `load_job`/
//! `set_dictionary`.

use std::io::Read;

use crate::job::{Job, DICT_SIZE};
use crate::pool::{Pool, PoolBuf};
use crate::queue::JobQueue;

/// Read until `buf` is full or the stream is exhausted, looping over
/// short reads -- matching the reference implementation's `Read()`
/// wrapper around the raw `read()` syscall, so that a pipe or socket
/// delivering data in small chunks does not fragment blocks
/// artificially.
fn fill_block<R: Read>(reader: &mut R, capacity: usize, buf: &mut PoolBuf) -> std::io::Result<()> {
    debug_assert!(buf.is_empty());
    let mut remaining = capacity;
    let mut tmp = vec![0u8; capacity];
    let mut filled = 0usize;
    while remaining > 0 {
        let n = reader.read(&mut tmp[filled..capacity])?;
        if n == 0 {
            break;
        }
        filled += n;
        remaining -= n;
    }
    tmp.truncate(filled);
    buf.extend_from_slice(&tmp);
    Ok(())
}

/// Produce jobs from `reader` onto `compress_queue` until the stream is
/// exhausted, then close the queue's single producer slot.
///
/// `input_pool`, `output_pool`, and `dict_pool` bound how many in-flight
/// input/output/dictionary buffers may exist at once, providing the
/// backpressure described in the component design's memory bound.
///
/// `compress_queue`'s producer slot is closed on every exit path,
/// including a propagated I/O error -- the reader is the queue's only
/// producer, so leaving it open on error would starve every worker (each
/// blocks forever in `compress_queue.pop()`) and, transitively, the
/// writer, turning an I/O error into a hang instead of the prompt abort
/// the error-handling design calls for.
pub fn run_reader<R: Read>(
    reader: R,
    compress_queue: &JobQueue,
    input_pool: &Pool,
    output_pool: &Pool,
    dict_pool: &Pool,
) -> std::io::Result<()> {
    let result = run_reader_inner(reader, compress_queue, input_pool, output_pool, dict_pool);
    compress_queue.close_producer();
    result
}

fn run_reader_inner<R: Read>(
    mut reader: R,
    compress_queue: &JobQueue,
    input_pool: &Pool,
    output_pool: &Pool,
    dict_pool: &Pool,
) -> std::io::Result<()> {
    let mut prev: Option<Job> = None;
    let mut seq: u64 = 0;

    loop {
        let mut input = input_pool.get();
        fill_block(&mut reader, input_pool.size(), &mut input)?;

        if input.is_empty() {
            if let Some(mut p) = prev.take() {
                p.more = false;
                compress_queue.push(p);
            }
            // The freshly-checked-out, unused input space returns to the
            // pool automatically when `input` (and thus this iteration's
            // Job, never constructed) goes out of scope.
            break;
        }

        let output = output_pool.get();
        let mut job = Job::new(seq, input, output);

        if let Some(p) = prev.take() {
            let tail_len = p.input.len().min(DICT_SIZE);
            let mut dict = dict_pool.get();
            dict.extend_from_slice(&p.input[p.input.len() - tail_len..]);
            job.dict = Some(dict);
            compress_queue.push(p);
        }

        prev = Some(job);
        seq += 1;
    }

    Ok(())
}
