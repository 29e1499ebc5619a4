//! Fixed-size worker pool owning one random stream per worker.
//!
//! The pool is created per generation call and dropped at its end. Work is
//! dispatched as synchronised rounds: every worker runs the same closure with
//! its own stream, and the caller receives the results in worker order once
//! all of them have finished.

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};

use crate::{
    error::{GenerationError, Result},
    seed::{SeedManager, WorkerStream},
};

pub(crate) struct WorkerPool {
    pool: ThreadPool,
    streams: Vec<WorkerStream>,
}

impl WorkerPool {
    pub(crate) fn new(seeds: SeedManager, worker_count: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|index| format!("nngen-worker-{index}"))
            .build()
            .map_err(|err| GenerationError::ThreadPool {
                message: Arc::from(err.to_string()),
            })?;
        Ok(Self {
            pool,
            streams: seeds.streams(worker_count),
        })
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.streams.len()
    }

    /// Runs one round: `work` is called once per worker and the results are
    /// returned in worker-index order. The first error aborts the round.
    pub(crate) fn round<T, F>(&mut self, work: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&mut WorkerStream) -> Result<T> + Sync,
    {
        let Self { pool, streams } = self;
        pool.install(|| streams.par_iter_mut().map(|stream| work(stream)).collect())
    }

    /// Hands `parts[i]` to worker `i`, runs all workers to completion and
    /// returns their results in worker order.
    ///
    /// `parts` must hold exactly one entry per worker.
    pub(crate) fn scatter<P, T, F>(&mut self, parts: Vec<P>, work: F) -> Result<Vec<T>>
    where
        P: Send,
        T: Send,
        F: Fn(P, &mut WorkerStream) -> Result<T> + Sync,
    {
        debug_assert_eq!(parts.len(), self.streams.len(), "one part per worker");
        let Self { pool, streams } = self;
        pool.install(|| {
            parts
                .into_par_iter()
                .zip(streams.par_iter_mut())
                .map(|(part, stream)| work(part, stream))
                .collect()
        })
    }

    /// Runs `work` inside the pool so nested rayon iterators use its threads.
    pub(crate) fn install<R, F>(&self, work: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(work)
    }
}
