//! Reusable byte buffers for request bodies

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// Buffers kept around for reuse
const MAX_IDLE: usize = 8;

/// Pool of encode buffers owned by one client.
///
/// [`BufferPool::acquire`] hands out a guard borrowing the pool; the buffer
/// is cleared and returned when the guard drops, on every exit path.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .free
            .lock()
            .ok()
            .and_then(|mut free| free.pop())
            .unwrap_or_default();

        PooledBuffer { buf, pool: self }
    }

    /// Number of buffers waiting for reuse
    pub fn idle(&self) -> usize {
        self.free.lock().map(|free| free.len()).unwrap_or(0)
    }

    fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        if let Ok(mut free) = self.free.lock() {
            if free.len() < MAX_IDLE {
                free.push(buf);
            }
        }
    }
}

/// Buffer on loan from a [`BufferPool`]
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
