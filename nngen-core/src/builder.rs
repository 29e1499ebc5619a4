//! Builder utilities for configuring edge generation.
//!
//! Validates the seed, worker count and graph flags before constructing an
//! [`EdgeGenerator`].

use std::num::NonZeroUsize;

use crate::{Result, error::GenerationError, generator::EdgeGenerator};

/// Master seed used when none is configured.
pub const DEFAULT_MASTER_SEED: u64 = 0x5EED_CAFE;

/// Configures and constructs [`EdgeGenerator`] instances.
///
/// # Examples
/// ```
/// use nngen_core::GeneratorBuilder;
///
/// let generator = GeneratorBuilder::new()
///     .with_master_seed(7)
///     .with_worker_count(2)
///     .with_multigraph(true)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(generator.master_seed(), 7);
/// assert_eq!(generator.worker_count().get(), 2);
/// assert!(generator.multigraph());
/// assert!(generator.directed());
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    master_seed: u64,
    worker_count: usize,
    multigraph: bool,
    directed: bool,
}

impl Default for GeneratorBuilder {
    fn default() -> Self {
        Self {
            master_seed: DEFAULT_MASTER_SEED,
            worker_count: rayon::current_num_threads(),
            multigraph: false,
            directed: true,
        }
    }
}

impl GeneratorBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use nngen_core::{DEFAULT_MASTER_SEED, GeneratorBuilder};
    ///
    /// let builder = GeneratorBuilder::new();
    /// assert_eq!(builder.master_seed(), DEFAULT_MASTER_SEED);
    /// assert_eq!(builder.worker_count(), rayon::current_num_threads());
    /// assert!(!builder.multigraph());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the master seed.
    #[must_use]
    pub fn with_master_seed(mut self, seed: u64) -> Self {
        self.master_seed = seed;
        self
    }

    /// Returns the configured master seed.
    #[must_use]
    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Overrides the number of workers; each generation call builds a pool
    /// of this size.
    ///
    /// # Examples
    /// ```
    /// use nngen_core::GeneratorBuilder;
    ///
    /// let builder = GeneratorBuilder::new().with_worker_count(3);
    /// assert_eq!(builder.worker_count(), 3);
    /// ```
    #[must_use]
    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Allows repeated `(source, target)` pairs.
    #[must_use]
    pub fn with_multigraph(mut self, multigraph: bool) -> Self {
        self.multigraph = multigraph;
        self
    }

    /// Returns whether repeated pairs are allowed.
    #[must_use]
    pub fn multigraph(&self) -> bool {
        self.multigraph
    }

    /// Marks the graph as directed or undirected.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Returns whether the graph is directed.
    #[must_use]
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Validates the configuration and constructs an [`EdgeGenerator`].
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] when the worker count
    /// is zero.
    ///
    /// # Examples
    /// ```
    /// use nngen_core::{GenerationErrorCode, GeneratorBuilder};
    ///
    /// let err = GeneratorBuilder::new().with_worker_count(0).build().unwrap_err();
    /// assert_eq!(err.code(), GenerationErrorCode::InvalidParameters);
    /// ```
    pub fn build(self) -> Result<EdgeGenerator> {
        let worker_count = NonZeroUsize::new(self.worker_count).ok_or_else(|| {
            GenerationError::invalid("worker count must be greater than zero")
        })?;
        Ok(EdgeGenerator::new(
            self.master_seed,
            worker_count,
            self.multigraph,
            self.directed,
        ))
    }
}
