//! Job queues: an unordered FIFO feeding the compression workers, and an
//! ordered-by-sequence-number queue feeding the writer.
//!
//! Grounded in `original_source/parallel.c`'s `job_queue_t` (intrusive
//! linked list + "use" mutex + "active" semaphore + producer count +
//! closed flag, with a broadcast condition variable for the ordered
//! variant). The intrusive list becomes an owning `VecDeque<Job>` per the
//! spec's design note that ownership transfers cleanly into and out of a
//! deque; the semaphore is folded into the same `Mutex`+`Condvar` pair
//! that guards the deque, exactly as in [`crate::pool`].

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::job::Job;

/// Returned by `pop`/`take` once a queue has both been closed and
/// drained of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueClosed;

struct State {
    items: VecDeque<Job>,
    producers: usize,
    closed: bool,
}

/// FIFO queue feeding the compression workers. Multiple producers are
/// supported in principle (the spec only ever uses one: the reader);
/// multiple consumers (the workers) call [`JobQueue::pop`].
pub struct JobQueue {
    state: Mutex<State>,
    update: Condvar,
}

impl JobQueue {
    /// Create a queue with `producers` registered producers. The queue
    /// transitions to closed only once every producer has called
    /// [`JobQueue::close_producer`].
    pub fn new(producers: usize) -> Self {
        Self {
            state: Mutex::new(State { items: VecDeque::new(), producers, closed: false }),
            update: Condvar::new(),
        }
    }

    /// Append a job to the tail of the queue. Panics if the queue has
    /// already been closed -- closed queues admit no further inserts, per
    /// the component design's invariants.
    pub fn push(&self, job: Job) {
        let mut state = self.state.lock();
        assert!(!state.closed, "push on a closed job queue");
        state.items.push_back(job);
        self.update.notify_one();
    }

    /// Block while the queue is empty and not closed. Returns `Ok(job)`
    /// for the next job in FIFO order, or `Err(QueueClosed)` once the
    /// queue is both empty and closed.
    pub fn pop(&self) -> Result<Job, QueueClosed> {
        let mut state = self.state.lock();
        loop {
            if let Some(job) = state.items.pop_front() {
                return Ok(job);
            }
            if state.closed {
                return Err(QueueClosed);
            }
            self.update.wait(&mut state);
        }
    }

    /// One producer is done submitting. Decrements the producer count;
    /// when it reaches zero the queue becomes closed and every waiter is
    /// woken so it can observe the closed-and-empty state.
    pub fn close_producer(&self) {
        let mut state = self.state.lock();
        assert!(state.producers > 0, "close_producer called too many times");
        state.producers -= 1;
        if state.producers == 0 {
            state.closed = true;
            self.update.notify_all();
        }
    }
}

/// Writer-feed queue: jobs may arrive out of sequence order, but the
/// writer always demands a specific `seq` next. Every insert broadcasts
/// the condition variable and the waiter rescans the list -- the spec
/// explicitly permits this simple approach over a `seq`-keyed heap, given
/// the expected job counts are bounded by a small multiple of the worker
/// count.
pub struct OrderedJobQueue {
    state: Mutex<State>,
    update: Condvar,
}

impl OrderedJobQueue {
    /// Create a queue with `producers` registered producers (one per
    /// compression worker: each worker closes the writer queue on exit,
    /// and the last one to do so transitions it to closed).
    pub fn new(producers: usize) -> Self {
        Self {
            state: Mutex::new(State { items: VecDeque::new(), producers, closed: false }),
            update: Condvar::new(),
        }
    }

    /// Insert a job; order at insertion time is irrelevant.
    pub fn push(&self, job: Job) {
        let mut state = self.state.lock();
        assert!(!state.closed, "push on a closed job queue");
        state.items.push_back(job);
        self.update.notify_all();
    }

    /// Block until a job with sequence number `seq` has been inserted, or
    /// the queue is closed and no such job will ever arrive. Each `seq`
    /// is taken at most once per the queue's invariants.
    pub fn take(&self, seq: u64) -> Result<Job, QueueClosed> {
        let mut state = self.state.lock();
        loop {
            if let Some(pos) = state.items.iter().position(|j| j.seq == seq) {
                return Ok(state.items.remove(pos).expect("position came from this deque"));
            }
            if state.closed {
                return Err(QueueClosed);
            }
            self.update.wait(&mut state);
        }
    }

    /// One compression worker is done. See [`JobQueue::close_producer`].
    pub fn close_producer(&self) {
        let mut state = self.state.lock();
        assert!(state.producers > 0, "close_producer called too many times");
        state.producers -= 1;
        if state.producers == 0 {
            state.closed = true;
            self.update.notify_all();
        }
    }
}
