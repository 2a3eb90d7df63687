//! Fixed-size work-stealing thread pool.
//!
//! The pool owns one [`StealingDeque`] per worker plus a global
//! [`SharedQueue`]. Workers drain their own deque first (LIFO), then the
//! global queue, then scan the other workers' deques for something to
//! steal. Submission from inside a worker lands on that worker's own
//! deque, keeping producer-consumer affinity when a task spawns further
//! tasks; submission from any other thread goes through the global queue.
//!
//! Shutdown is a one-way terminate flag observed at the top of every
//! work-loop iteration. Tasks still queued when the flag is raised are
//! dropped, not executed.

mod deque;
mod queue;
mod task;
mod tests;

pub use deque::StealingDeque;
pub use queue::SharedQueue;
pub use task::Task;

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};

use log::{debug, error};

/// State shared between the pool handle, its workers, and submitters.
struct PoolShared {
    /// One-way shutdown flag; stored with `Release`, read with `Acquire`.
    terminate: AtomicBool,
    global: SharedQueue<Task>,
    deques: Vec<StealingDeque<Task>>,
}

thread_local! {
    /// Which pool and worker index this thread belongs to, if any.
    ///
    /// Set once at worker startup and read-only afterwards; used only to
    /// route submissions from inside a worker onto its own deque.
    static WORKER_CONTEXT: RefCell<Option<(Weak<PoolShared>, usize)>> =
        const { RefCell::new(None) };
}

/// Explicit per-worker context handed to the work loop at spawn time.
struct WorkerContext {
    index: usize,
    shared: Arc<PoolShared>,
}

/// A fixed pool of worker threads with per-worker stealing deques.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads, each with its own deque.
    ///
    /// If any spawn fails, the terminate flag is raised immediately: a
    /// pool that cannot bring up its workers behaves as already shutting
    /// down rather than half-alive.
    pub fn new(workers: usize) -> Self {
        assert!(workers > 0, "worker pool needs at least one worker");

        let shared = Arc::new(PoolShared {
            terminate: AtomicBool::new(false),
            global: SharedQueue::new(),
            deques: (0..workers).map(|_| StealingDeque::new()).collect(),
        });

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let context = WorkerContext {
                index,
                shared: Arc::clone(&shared),
            };
            let spawned = thread::Builder::new()
                .name(format!("staticserve-worker-{index}"))
                .spawn(move || work_loop(context));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!("failed to spawn worker {index}: {e}; terminating pool");
                    shared.terminate.store(true, Ordering::Release);
                    break;
                }
            }
        }

        Self { shared, handles }
    }

    /// Number of workers the pool was built with.
    pub fn workers(&self) -> usize {
        self.shared.deques.len()
    }

    /// Submit a closure for execution.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Box::new(f));
    }

    /// Submit an already-boxed task for execution.
    pub fn submit(&self, task: Task) {
        submit_to(&self.shared, task);
    }

    /// A cloneable handle for submitting tasks from other threads or
    /// from inside running tasks.
    pub fn submitter(&self) -> Submitter {
        Submitter {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Whether shutdown has been requested.
    pub fn is_terminated(&self) -> bool {
        self.shared.terminate.load(Ordering::Acquire)
    }

    /// Raise the terminate flag and join all workers.
    ///
    /// Idempotent: calling it on an already-stopped pool is a no-op.
    /// Tasks still queued are abandoned; anything they own (accepted
    /// connections included) is released by their destructors.
    pub fn shutdown(&mut self) {
        self.shared.terminate.store(true, Ordering::Release);
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cloneable submission handle detached from the pool's lifecycle.
///
/// Lets a running task spawn further tasks without borrowing the pool
/// itself. Submissions after shutdown are accepted and silently dropped
/// with the rest of the backlog.
#[derive(Clone)]
pub struct Submitter {
    shared: Arc<PoolShared>,
}

impl Submitter {
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Box::new(f));
    }

    pub fn submit(&self, task: Task) {
        submit_to(&self.shared, task);
    }
}

/// Route a task to the submitting worker's own deque when the calling
/// thread is a worker of this pool, otherwise to the global queue.
fn submit_to(shared: &Arc<PoolShared>, task: Task) {
    let own_index = WORKER_CONTEXT.with(|context| {
        context.borrow().as_ref().and_then(|(pool, index)| {
            let pool = pool.upgrade()?;
            Arc::ptr_eq(&pool, shared).then_some(*index)
        })
    });

    match own_index {
        Some(index) => shared.deques[index].push_front(task),
        None => shared.global.push(task),
    }
}

/// The worker loop: own deque, then global queue, then steal; yield when
/// all three come up empty. Exits when the terminate flag is observed.
fn work_loop(context: WorkerContext) {
    WORKER_CONTEXT.with(|cell| {
        *cell.borrow_mut() = Some((Arc::downgrade(&context.shared), context.index));
    });

    let shared = &context.shared;
    let index = context.index;

    while !shared.terminate.load(Ordering::Acquire) {
        let task = shared.deques[index]
            .try_pop_front()
            .or_else(|| shared.global.try_pop())
            .or_else(|| try_steal(shared, index));

        match task {
            Some(task) => run_task(task, index),
            None => thread::yield_now(),
        }
    }

    debug!("worker {index} exiting");
}

/// Scan the other workers' deques once, starting just past our own
/// index, and take the oldest task from the first non-empty victim.
fn try_steal(shared: &PoolShared, index: usize) -> Option<Task> {
    let workers = shared.deques.len();
    for offset in 1..workers {
        let victim = (index + offset) % workers;
        if let Some(task) = shared.deques[victim].try_steal_back() {
            return Some(task);
        }
    }
    None
}

/// Invoke a task, containing any panic so it cannot take the worker
/// down or poison the scheduling loop.
fn run_task(task: Task, index: usize) {
    if catch_unwind(AssertUnwindSafe(task)).is_err() {
        error!("task on worker {index} panicked; worker continues");
    }
}
