//! Global overflow queue shared by all workers.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A mutex-protected FIFO queue.
///
/// Takes submissions from threads outside the pool (the acceptor) and
/// serves as the fallback workers check when their own deque is empty.
/// One global lock is acceptable here: the per-worker deques absorb the
/// bulk of the traffic, so only the acceptor and idle workers contend.
pub struct SharedQueue<T> {
    inner: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> SharedQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Append an item. Never blocks, never rejects.
    pub fn push(&self, item: T) {
        let mut queue = self.inner.lock().unwrap();
        queue.push_back(item);
        self.available.notify_one();
    }

    /// Take the oldest item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Take the oldest item, blocking until one is available.
    pub fn wait_pop(&self) -> T {
        let mut queue = self.inner.lock().unwrap();
        loop {
            match queue.pop_front() {
                Some(item) => return item,
                None => queue = self.available.wait(queue).unwrap(),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

impl<T> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
