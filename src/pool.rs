//! A bounded allocator of fixed-size byte buffers ("spaces").
//!
//! Grounded in `original_source/parallel.c`'s `pool_t`/`space_t` (a free
//! list guarded by a counting semaphore plus a mutex). The semaphore is
//! replaced here by a `Condvar` guarding the same `Mutex` that protects the
//! free list, which is the idiomatic Rust substitute for "block until a
//! slot is free" used throughout the wider thread-pool ecosystem (see e.g.
//! the `TPool`-style bounded-channel-as-semaphore pattern): a single lock
//! serializes both structural updates and blocking, which is simpler than
//! the teacher C source's two separate primitives without losing any of
//! the backpressure behavior the spec calls for.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// A single checked-out buffer. Returned to its pool automatically on
/// `Drop`, so callers cannot forget to release one.
///
/// Mirrors `space_t`: a byte buffer plus a `len` marker for the valid
/// payload prefix. `capacity()` starts at the pool's nominal `size` but
/// may grow past it for callers that reach for [`PoolBuf::as_vec_mut`].
pub struct PoolBuf {
    buf: Vec<u8>,
    pool: Arc<PoolInner>,
}

impl PoolBuf {
    /// The valid payload length. Starts at zero on every checkout.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// This buffer's current capacity: the pool's nominal `size` unless
    /// grown past it via [`PoolBuf::as_vec_mut`].
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Extend the valid payload by appending bytes, up to `capacity()`.
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        debug_assert!(self.buf.len() + data.len() <= self.buf.capacity());
        self.buf.extend_from_slice(data);
    }

    /// Truncate the valid payload back to zero without returning the
    /// buffer to the pool (used when a space is reused in place).
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Borrow the backing `Vec<u8>` directly, for callers (the deflate
    /// engine) that need to grow it past its nominal `capacity()` via
    /// `reserve`/push-style APIs that a plain `&mut [u8]` can't express.
    /// The pool's `size` is a sizing hint for the common case, not a hard
    /// cap: a buffer that outgrows it is simply returned to the free list
    /// at its new, larger capacity.
    pub fn as_vec_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl std::ops::Deref for PoolBuf {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl std::ops::DerefMut for PoolBuf {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl Drop for PoolBuf {
    fn drop(&mut self) {
        let returned = std::mem::take(&mut self.buf);
        self.pool.drop_space(returned);
    }
}

struct PoolInner {
    size: usize,
    limit: usize,
    state: Mutex<PoolState>,
    available: Condvar,
}

struct PoolState {
    free: Vec<Vec<u8>>,
    made: usize,
}

impl PoolInner {
    fn drop_space(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut state = self.state.lock();
        state.free.push(buf);
        self.available.notify_one();
    }
}

/// A fixed-capacity cache of spaces of one size.
///
/// Invariant: at any instant, `checked_out + free.len() <= limit`.
/// `get()` blocks iff `checked_out == limit` and the free list is empty.
#[derive(Clone)]
pub struct Pool {
    inner: Arc<PoolInner>,
}

impl Pool {
    /// Create a new pool of buffers of `size` bytes, allowing at most
    /// `limit` to exist simultaneously. Buffers are allocated lazily, on
    /// first demand, not up front.
    pub fn new(size: usize, limit: usize) -> Self {
        assert!(limit > 0, "pool limit must be > 0");
        Self {
            inner: Arc::new(PoolInner {
                size,
                limit,
                state: Mutex::new(PoolState { free: Vec::new(), made: 0 }),
                available: Condvar::new(),
            }),
        }
    }

    /// The fixed buffer size of spaces vended by this pool.
    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// Block until a space is available, then return it. Never returns
    /// a null/empty handle: on exhaustion this call parks the calling
    /// thread on the pool's condition variable until another holder drops
    /// its space.
    pub fn get(&self) -> PoolBuf {
        let mut state = self.inner.state.lock();
        loop {
            if let Some(buf) = state.free.pop() {
                return PoolBuf { buf, pool: self.inner.clone() };
            }
            if state.made < self.inner.limit {
                state.made += 1;
                let buf = Vec::with_capacity(self.inner.size);
                return PoolBuf { buf, pool: self.inner.clone() };
            }
            self.inner.available.wait(&mut state);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Barrier;
    use std::time::Duration;

    #[test]
    fn reuses_spaces() {
        let pool = Pool::new(16, 2);
        let a = pool.get();
        drop(a);
        let b = pool.get();
        assert_eq!(b.capacity(), 16);
    }

    #[test]
    fn blocks_at_limit() {
        let pool = Pool::new(16, 1);
        let held = pool.get();

        let pool2 = pool.clone();
        let barrier = Arc::new(Barrier::new(2));
        let barrier2 = barrier.clone();
        let handle = std::thread::spawn(move || {
            barrier2.wait();
            // This blocks until `held` is dropped on the main thread.
            let _second = pool2.get();
        });

        barrier.wait();
        // Give the spawned thread a chance to block on the pool.
        std::thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());

        drop(held);
        handle.join().unwrap();
    }

    #[test]
    fn never_exceeds_limit() {
        let pool = Pool::new(8, 3);
        let _a = pool.get();
        let _b = pool.get();
        let _c = pool.get();
        let state = pool.inner.state.lock();
        assert_eq!(state.made, 3);
    }
}
