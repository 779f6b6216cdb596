//! Compression worker: one per thread, each pulling jobs from the
//! unordered compression queue and pushing finished jobs onto the
//! ordered writer queue.
//!
//! Grounded in `original_source/parallel.c`'s `compress_thread`: a
//! per-thread `z_stream`, reset and (when a dictionary is present)
//! re-primed for every job, driven to `Z_SYNC_FLUSH` or `Z_FINISH`
//! depending on `job->more`, followed by a CRC-32 over the raw input and
//! a push onto the write queue.

use crate::crc::crc32;
use crate::deflate::DeflateEngine;
use crate::job::Job;
use crate::queue::{JobQueue, OrderedJobQueue, QueueClosed};

/// Drain `compress_queue` until it closes, compressing each job in turn
/// and forwarding it to `write_queue`. Runs on its own OS thread; one
/// instance per configured worker.
pub fn run_worker(level: u8, compress_queue: &JobQueue, write_queue: &OrderedJobQueue) {
    let mut engine = DeflateEngine::new(level);

    loop {
        let mut job = match compress_queue.pop() {
            Ok(job) => job,
            Err(QueueClosed) => break,
        };

        compress_job(&mut engine, &mut job);
        write_queue.push(job);
    }

    write_queue.close_producer();
}

/// Compress and checksum a single job in place, ready for the writer.
fn compress_job(engine: &mut DeflateEngine, job: &mut Job) {
    engine.reset();
    if let Some(dict) = job.dict.as_ref() {
        engine.set_dictionary(dict);
    }
    // The dictionary has done its job priming the encoder; release it
    // back to its pool now rather than holding it through the writer
    // queue, so the reader can reuse the space sooner.
    job.dict = None;

    engine
        .compress_block(&job.input, job.output.as_vec_mut(), !job.more)
        .expect("raw deflate of an in-memory buffer cannot fail");

    job.check = crc32(&job.input);
}
