//! The pipeline entry point: wires the pools and queues together and
//! spawns the `workers + 2` OS threads described in the concurrency
//! model (one reader, N compression workers, one writer), then joins
//! them and propagates the first error encountered.
//!
//! Grounded in `original_source/parallel.c`'s `parallel_compress`, which
//! allocates the pools, starts the thread pool, runs the reader inline
//! on the calling thread, and joins the writer before returning.

use std::io::{Read, Write};
use std::thread;

use crate::error::PigzResult;
use crate::job::DICT_SIZE;
use crate::options::Options;
use crate::pool::Pool;
use crate::queue::{JobQueue, OrderedJobQueue};
use crate::reader::run_reader;
use crate::writer::run_writer;

/// Compress `input` into a single gzip member written to `output`,
/// using `options` to drive level, block size, and worker count.
///
/// Spawns `options.workers()` compression-worker threads plus one
/// writer thread and runs the reader on the calling thread, matching
/// the reference implementation's choice to fold the reader into the
/// thread that called `parallel_compress`. `std::thread::scope` lets
/// every spawned thread borrow the pools and queues directly rather
/// than requiring an `Arc` around each one. Returns the number of
/// uncompressed bytes written once the whole stream has been consumed
/// and the gzip trailer flushed.
pub fn compress<R, W>(options: &Options, mut input: R, output: W) -> PigzResult<u64>
where
    R: Read,
    W: Write + Send,
{
    let workers = options.workers();
    let block_size = options.block_size();

    // Pool limits follow the component design's memory bound: bounding
    // in-flight spaces at a small multiple of the worker count caps
    // total memory use independent of stream length.
    let input_pool = Pool::new(block_size, 2 * workers);
    let output_pool = Pool::new(crate::job::output_buffer_size(block_size), 2 * workers);
    let dict_pool = Pool::new(DICT_SIZE, 2 * workers);

    let compress_queue = JobQueue::new(1); // one producer: the reader
    let write_queue = OrderedJobQueue::new(workers); // one producer per worker

    thread::scope(|scope| -> PigzResult<u64> {
        for _ in 0..workers {
            let level = options.level();
            let compress_queue = &compress_queue;
            let write_queue = &write_queue;
            scope.spawn(move || {
                crate::worker::run_worker(level, compress_queue, write_queue);
            });
        }

        let writer_handle = {
            let write_queue = &write_queue;
            scope.spawn(move || run_writer(options, write_queue, output))
        };

        let reader_result =
            run_reader(&mut input, &compress_queue, &input_pool, &output_pool, &dict_pool);

        let ulen = writer_handle
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
        reader_result?;
        Ok(ulen)
    })
}
