//! Tests for the work-stealing pool.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::pool::{SharedQueue, StealingDeque, WorkerPool};

    /// Poll until `condition` holds or the deadline passes.
    fn wait_for(condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        condition()
    }

    #[test]
    fn test_deque_owner_pops_lifo() {
        let deque = StealingDeque::new();
        assert!(deque.is_empty());
        deque.push_front(1);
        deque.push_front(2);
        deque.push_front(3);
        assert_eq!(deque.len(), 3);

        assert_eq!(deque.try_pop_front(), Some(3));
        assert_eq!(deque.try_pop_front(), Some(2));
        assert_eq!(deque.try_pop_front(), Some(1));
        assert_eq!(deque.try_pop_front(), None);
    }

    #[test]
    fn test_deque_thief_steals_fifo() {
        let deque = StealingDeque::new();
        deque.push_front(1);
        deque.push_front(2);
        deque.push_front(3);

        assert_eq!(deque.try_steal_back(), Some(1));
        assert_eq!(deque.try_steal_back(), Some(2));
        assert_eq!(deque.try_steal_back(), Some(3));
        assert_eq!(deque.try_steal_back(), None);
    }

    #[test]
    fn test_deque_wait_pop_front_blocks_until_push() {
        let deque = Arc::new(StealingDeque::new());
        let producer = {
            let deque = Arc::clone(&deque);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                deque.push_front(42);
            })
        };

        assert_eq!(deque.wait_pop_front(), 42);
        producer.join().unwrap();
    }

    #[test]
    fn test_racing_pop_and_steal_extract_each_item_once() {
        let deque = Arc::new(StealingDeque::new());
        for i in 0..1000 {
            deque.push_front(i);
        }

        let stealer = {
            let deque = Arc::clone(&deque);
            thread::spawn(move || {
                let mut stolen = Vec::new();
                while let Some(item) = deque.try_steal_back() {
                    stolen.push(item);
                }
                stolen
            })
        };

        let mut popped = Vec::new();
        while let Some(item) = deque.try_pop_front() {
            popped.push(item);
        }

        let mut all = stealer.join().unwrap();
        all.extend(popped);
        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_shared_queue_is_fifo() {
        let queue = SharedQueue::new();
        queue.push("a");
        queue.push("b");
        queue.push("c");
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.try_pop(), Some("a"));
        assert_eq!(queue.try_pop(), Some("b"));
        assert_eq!(queue.try_pop(), Some("c"));
        assert_eq!(queue.try_pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_shared_queue_wait_pop_blocks_until_push() {
        let queue = Arc::new(SharedQueue::new());
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                queue.push(7);
            })
        };

        assert_eq!(queue.wait_pop(), 7);
        producer.join().unwrap();
    }

    #[test]
    fn test_pool_runs_every_task_exactly_once() {
        let mut pool = WorkerPool::new(4);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..200 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert!(wait_for(|| counter.load(Ordering::SeqCst) == 200));
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn test_shutdown_is_idempotent_and_terminal() {
        let mut pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));

        pool.shutdown();
        pool.shutdown();
        assert!(pool.is_terminated());

        // Submission after shutdown is accepted but never dequeued.
        let after = Arc::clone(&counter);
        pool.execute(move || {
            after.fetch_add(1, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(50));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blocked_worker_has_its_backlog_stolen() {
        let mut pool = WorkerPool::new(4);
        let submitter = pool.submitter();
        let counter = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = mpsc::channel();
        const CHILDREN: usize = 8;

        let parent_counter = Arc::clone(&counter);
        pool.execute(move || {
            // Children land on this worker's own deque.
            for _ in 0..CHILDREN {
                let counter = Arc::clone(&parent_counter);
                let done_tx = done_tx.clone();
                submitter.execute(move || {
                    if counter.fetch_add(1, Ordering::SeqCst) + 1 == CHILDREN {
                        let _ = done_tx.send(());
                    }
                });
            }
            // Pin this worker until every child has run elsewhere.
            let _ = done_rx.recv_timeout(Duration::from_secs(5));
        });

        assert!(wait_for(|| counter.load(Ordering::SeqCst) == CHILDREN));
        pool.shutdown();
    }

    #[test]
    fn test_panicking_task_does_not_kill_the_worker() {
        let mut pool = WorkerPool::new(1);
        let counter = Arc::new(AtomicUsize::new(0));

        pool.execute(|| panic!("boom"));
        let counter_in_task = Arc::clone(&counter);
        pool.execute(move || {
            counter_in_task.fetch_add(1, Ordering::SeqCst);
        });

        assert!(wait_for(|| counter.load(Ordering::SeqCst) == 1));
        pool.shutdown();
    }

    #[test]
    fn test_submitter_works_from_external_threads() {
        let mut pool = WorkerPool::new(2);
        let submitter = pool.submitter();
        let counter = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let submitter = submitter.clone();
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..25 {
                        let counter = Arc::clone(&counter);
                        submitter.execute(move || {
                            counter.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(wait_for(|| counter.load(Ordering::SeqCst) == 100));
        pool.shutdown();
    }
}
