//! Fixed-size worker pool for candidate evaluation.

use std::num::NonZeroUsize;
use std::thread;

use cartera_traits::{CarteraError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Default pool size: one less than the available parallelism, at least one.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .saturating_sub(1)
        .max(1)
}

/// A bounded pool of OS threads, built once per run.
///
/// The threads are released when the pool is dropped, which covers every exit
/// path of a run including early returns and panics.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Starts a pool of `workers` threads, or [`default_workers`] if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CarteraError::WorkerPool`] if the threads cannot be spawned.
    pub fn new(workers: Option<usize>) -> Result<Self> {
        let workers = workers.unwrap_or_else(default_workers).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("cartera-worker-{i}"))
            .build()
            .map_err(|e| CarteraError::WorkerPool(e.to_string()))?;
        Ok(Self { pool, workers })
    }

    /// Number of worker threads.
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Applies `f` to every item in parallel and waits for all of them.
    ///
    /// Results come back in item order regardless of which thread ran them.
    /// The first error aborts the map and is returned.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Result<Vec<R>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> Result<R> + Sync + Send,
    {
        self.pool.install(|| items.par_iter().map(&f).collect())
    }
}
