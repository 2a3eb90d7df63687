//! The unit of work submitted to the pool.

/// A type-erased, move-only unit of deferred work.
///
/// A task owns everything it needs (notably an accepted connection) and
/// is invoked exactly once on whichever worker extracts it.
pub type Task = Box<dyn FnOnce() + Send + 'static>;
