//! Per-worker random streams derived from a master seed.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Derives one deterministic stream per worker from a master seed.
///
/// Worker `i` is seeded with `master + i + 1` (wrapping), so two generators
/// built with the same master seed and worker count see identical streams.
///
/// # Examples
/// ```
/// use nngen_core::SeedManager;
///
/// let seeds = SeedManager::new(10);
/// assert_eq!(seeds.worker_seed(0), 11);
/// assert_eq!(seeds.worker_seed(3), 14);
/// assert_eq!(SeedManager::new(u64::MAX).worker_seed(0), 0);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeedManager {
    master: u64,
}

impl SeedManager {
    /// Creates a seed manager for `master`.
    #[must_use]
    pub const fn new(master: u64) -> Self {
        Self { master }
    }

    /// Returns the master seed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn master(&self) -> u64 { self.master }

    /// Returns the seed assigned to worker `index`.
    #[must_use]
    pub const fn worker_seed(&self, index: usize) -> u64 {
        self.master.wrapping_add(index as u64).wrapping_add(1)
    }

    /// Builds the streams for `worker_count` workers in index order.
    #[must_use]
    pub fn streams(&self, worker_count: usize) -> Vec<WorkerStream> {
        (0..worker_count)
            .map(|index| WorkerStream::new(index, self.worker_seed(index)))
            .collect()
    }
}

/// A worker's private pseudo-random stream.
#[derive(Clone, Debug)]
pub struct WorkerStream {
    index: usize,
    rng: SmallRng,
}

impl WorkerStream {
    fn new(index: usize, seed: u64) -> Self {
        Self {
            index,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Returns the index of the worker that owns this stream.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(&self) -> usize { self.index }

    /// Draws a uniform integer from the inclusive range `[min, max]`.
    pub fn uniform_id(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..=max)
    }

    /// Draws a uniform value from `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }
}
