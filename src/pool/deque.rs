//! Per-worker work-stealing deque.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A double-ended queue owned by one worker and stolen from by the rest.
///
/// The owning worker pushes and pops at the front, so its own work is
/// consumed LIFO — the most recently pushed task is the most likely to
/// still be cache-hot. Thieves take from the back, FIFO, so the oldest
/// backlog is redistributed first.
///
/// A single mutex serializes all operations; a steal only ever locks the
/// victim's deque, never two deques at once.
pub struct StealingDeque<T> {
    inner: Mutex<VecDeque<T>>,
    available: Condvar,
}

impl<T> StealingDeque<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Push an item at the front. Owner-only; wakes one blocked waiter.
    pub fn push_front(&self, item: T) {
        let mut deque = self.inner.lock().unwrap();
        deque.push_front(item);
        self.available.notify_one();
    }

    /// Pop from the front without blocking. Owner-only.
    pub fn try_pop_front(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Steal from the back without blocking. Any non-owner thread.
    pub fn try_steal_back(&self) -> Option<T> {
        self.inner.lock().unwrap().pop_back()
    }

    /// Pop from the front, blocking until an item is available.
    pub fn wait_pop_front(&self) -> T {
        let mut deque = self.inner.lock().unwrap();
        loop {
            match deque.pop_front() {
                Some(item) => return item,
                None => deque = self.available.wait(deque).unwrap(),
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

impl<T> Default for StealingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}
