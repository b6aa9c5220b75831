use std::ops::Range;
use std::sync::{Mutex, PoisonError};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::WicketError;

/// Fixed set of workers reused by every iteration.
///
/// Work is handed out in chunks through a shared cursor; the calling thread drains chunks too,
/// and the end of [`ThreadPool::in_place_scope`] is the only join point.
pub(crate) struct WorkerPool {
    pool: Option<ThreadPool>,
    threads: usize,
}

impl WorkerPool {
    pub(crate) fn new(threads: usize) -> Result<Self, WicketError> {
        let pool = if threads > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads - 1)
                    .thread_name(|i| format!("wicket-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self { pool, threads })
    }

    #[inline]
    pub(crate) fn threads(&self) -> usize {
        self.threads
    }

    /// Runs `work` over `0..total` in chunks of `chunk` and returns the results in chunk order.
    pub(crate) fn run_chunks<R, F>(&self, total: usize, chunk: usize, work: F) -> Vec<R>
    where
        R: Send,
        F: Fn(Range<usize>) -> R + Sync,
    {
        let chunk = chunk.max(1);
        let chunks = total.div_ceil(chunk);
        let cursor = Mutex::new(0usize);
        let results: Mutex<Vec<(usize, R)>> = Mutex::new(Vec::with_capacity(chunks));

        let drain = || loop {
            let next = {
                let mut cursor = cursor.lock().unwrap_or_else(PoisonError::into_inner);
                if *cursor >= chunks {
                    break;
                }
                *cursor += 1;
                *cursor - 1
            };
            let start = next * chunk;
            let out = work(start..(start + chunk).min(total));
            results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((next, out));
        };

        match &self.pool {
            Some(pool) if chunks > 1 => pool.in_place_scope(|scope| {
                for _ in 1..self.threads.min(chunks) {
                    scope.spawn(|_| drain());
                }
                drain();
            }),
            _ => drain(),
        }

        let mut results = results.into_inner().unwrap_or_else(PoisonError::into_inner);
        results.sort_unstable_by_key(|(i, _)| *i);
        results.into_iter().map(|(_, r)| r).collect()
    }
}
