//! Bounded worker pool.
//!
//! A thin layer over a dedicated [`rayon::ThreadPool`]: batches run with
//! [`WorkerPool::map`] and come back in task-index order, single tasks go
//! through [`WorkerPool::submit`] and are awaited with [`TaskHandle::wait`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{Result, TspError};

/// Fixed-size pool of worker threads.
///
/// # Examples
///
/// ```
/// use u_tsp::pool::WorkerPool;
///
/// let pool = WorkerPool::new(2).unwrap();
/// let squares = pool.map(5, |i| i * i);
/// assert_eq!(squares, vec![0, 1, 4, 9, 16]);
///
/// let handle = pool.submit(|| 40 + 2);
/// assert_eq!(handle.wait(), Some(42));
/// ```
pub struct WorkerPool {
    pool: ThreadPool,
    threads: usize,
    /// Bumped by `cancel_pending`; tasks submitted under an older value skip.
    epoch: Arc<AtomicU64>,
}

impl WorkerPool {
    /// Starts `threads` workers; `0` means one per available core.
    pub fn new(threads: usize) -> Result<Self> {
        let threads = if threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        } else {
            threads
        };
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("u-tsp-worker-{i}"))
            .build()
            .map_err(|e| TspError::Pool(e.to_string()))?;
        debug!(threads, "worker pool started");
        Ok(Self {
            pool,
            threads,
            epoch: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Runs `f(i)` for every `i in 0..count` on the workers and returns the
    /// results in index order. Blocks until the whole batch is done.
    pub fn map<T, F>(&self, count: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        self.pool
            .install(|| (0..count).into_par_iter().map(f).collect())
    }

    /// Queues `task` without blocking.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = sync_channel(1);
        let epoch = Arc::clone(&self.epoch);
        let submitted = epoch.load(Ordering::Acquire);
        self.pool.spawn(move || {
            if epoch.load(Ordering::Acquire) != submitted {
                return;
            }
            // The handle may already be gone.
            let _ = tx.send(task());
        });
        TaskHandle { rx }
    }

    /// Makes every submitted task that has not started yet return without
    /// running. Tasks already running finish normally.
    pub fn cancel_pending(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    /// Consumes the pool so no more work can be submitted.
    ///
    /// Does not block. Rayon signals the worker threads to terminate; they
    /// finish any task already submitted and then exit in the background, so
    /// outstanding [`TaskHandle`]s still receive their results.
    pub fn shutdown(self) {
        debug!(threads = self.threads, "worker pool shut down");
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}

/// Pending result of a submitted task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Blocks until the task finishes.
    ///
    /// Returns `None` if the task was cancelled before it started or
    /// panicked.
    pub fn wait(self) -> Option<T> {
        self.rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_map_keeps_index_order() {
        let pool = WorkerPool::new(3).expect("pool");
        assert_eq!(pool.threads(), 3);
        let out = pool.map(100, |i| i * 2);
        assert_eq!(out, (0..100).map(|i| i * 2).collect::<Vec<_>>());
        assert!(pool.map(0, |i| i).is_empty());
    }

    #[test]
    fn test_zero_threads_uses_available_parallelism() {
        let pool = WorkerPool::new(0).expect("pool");
        assert!(pool.threads() >= 1);
    }

    #[test]
    fn test_submit_and_wait() {
        let pool = WorkerPool::new(2).expect("pool");
        let handles: Vec<_> = (0..10).map(|i| pool.submit(move || i + 1)).collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.wait()).collect();
        assert_eq!(results, (1..=10).map(Some).collect::<Vec<_>>());
        pool.shutdown();
    }

    #[test]
    fn test_cancel_pending_skips_queued_tasks() {
        let pool = WorkerPool::new(1).expect("pool");
        let (started_tx, started_rx) = channel();
        let (release_tx, release_rx) = channel::<()>();

        let running = pool.submit(move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
            1
        });
        let queued = pool.submit(|| 2);

        started_rx.recv().expect("first task started");
        pool.cancel_pending();
        release_tx.send(()).expect("release");

        assert_eq!(running.wait(), Some(1));
        assert_eq!(queued.wait(), None);

        let after = pool.submit(|| 3);
        assert_eq!(after.wait(), Some(3));
    }

    #[test]
    fn test_shutdown_does_not_drop_submitted_tasks() {
        let pool = WorkerPool::new(1).expect("pool");
        let (release_tx, release_rx) = channel::<()>();

        let running = pool.submit(move || {
            let _ = release_rx.recv();
            1
        });
        let queued = pool.submit(|| 2);

        pool.shutdown();
        release_tx.send(()).expect("release");

        assert_eq!(running.wait(), Some(1));
        assert_eq!(queued.wait(), Some(2));
    }
}
