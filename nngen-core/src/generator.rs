//! Instrumented entry points for edge generation.
//!
//! Each call builds its own worker pool and per-worker streams, runs one
//! generator to completion, and drops all generation-scoped state before
//! returning.

use std::num::NonZeroUsize;

use tracing::{info, instrument};

use crate::{
    Result,
    count::EdgeCount,
    degree::{self, DegreeSequenceRequest},
    report::GenerationReport,
    seed::SeedManager,
    spatial::{self, DistanceRuleRequest},
    workers::WorkerPool,
};

/// Runs degree-sequence and distance-rule generation.
///
/// Output storage is supplied by the caller as a flat slice of interleaved
/// `(source, target)` ids sized for the existing edges plus the new ones.
/// The existing edges are copied to the front unchanged. On error the
/// buffer contents are unspecified.
///
/// # Examples
/// ```
/// use nngen_core::{DegreeSequence, DegreeSequenceRequest, EdgeBuffer, GeneratorBuilder};
///
/// let generator = GeneratorBuilder::new().with_worker_count(2).build()?;
/// let nodes: Vec<usize> = (0..20).collect();
/// let degrees = DegreeSequence::fixed(nodes.len(), 3);
/// let request = DegreeSequenceRequest::new(&nodes, &nodes, degrees.as_slice())?;
/// let mut buffer = EdgeBuffer::zeroed(request.total_edges()?);
/// let report = generator.degree_sequence(&request, buffer.as_mut_slice())?;
/// assert_eq!(buffer.edge_count(), 60);
/// assert!(report.trials() >= 60);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EdgeGenerator {
    master_seed: u64,
    worker_count: NonZeroUsize,
    multigraph: bool,
    directed: bool,
}

impl EdgeGenerator {
    pub(crate) fn new(
        master_seed: u64,
        worker_count: NonZeroUsize,
        multigraph: bool,
        directed: bool,
    ) -> Self {
        Self {
            master_seed,
            worker_count,
            multigraph,
            directed,
        }
    }

    /// Returns the master seed.
    #[must_use]
    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Returns the number of workers used per call.
    #[must_use]
    pub fn worker_count(&self) -> NonZeroUsize {
        self.worker_count
    }

    /// Returns whether repeated pairs are allowed.
    #[must_use]
    pub fn multigraph(&self) -> bool {
        self.multigraph
    }

    /// Returns whether the graph is directed.
    #[must_use]
    pub fn directed(&self) -> bool {
        self.directed
    }

    /// Resolves `count` against source and target population sizes, halving
    /// it when the graph is undirected.
    ///
    /// # Errors
    /// Returns [`crate::GenerationError::InvalidParameters`] for negative or
    /// non-finite densities and degrees.
    pub fn resolve_edge_count(
        &self,
        count: EdgeCount,
        sources: usize,
        targets: usize,
    ) -> Result<usize> {
        count.resolve(sources, targets, self.directed)
    }

    fn pool(&self) -> Result<WorkerPool> {
        WorkerPool::new(SeedManager::new(self.master_seed), self.worker_count.get())
    }

    /// Gives every source node exactly its requested degree.
    ///
    /// # Errors
    /// Returns [`crate::GenerationError::Capacity`] when a degree exceeds the
    /// distinct targets a node can reach,
    /// [`crate::GenerationError::PreconditionViolation`] when a node with a
    /// non-zero degree already owns existing edges, buffer and length errors
    /// for malformed requests, and
    /// [`crate::GenerationError::GenerationTimeout`] if sampling gives up.
    #[instrument(
        name = "generation.degree_sequence",
        err,
        skip(self, request, out),
        fields(
            nodes = request.sources().len(),
            existing = request.existing().len(),
            side = ?request.side(),
            workers = self.worker_count.get(),
            seed = self.master_seed,
            multigraph = self.multigraph,
            directed = self.directed,
        ),
    )]
    pub fn degree_sequence(
        &self,
        request: &DegreeSequenceRequest<'_>,
        out: &mut [usize],
    ) -> Result<GenerationReport> {
        let mut pool = self.pool()?;
        let report = degree::generate(&mut pool, request, self.multigraph, out)?;
        info!(
            edges = request.total_edges()?,
            rounds = report.rounds(),
            trials = report.trials(),
            duplicates = report.duplicates_discarded(),
            "degree-sequence generation completed"
        );
        Ok(report)
    }

    /// Adds exactly `num_edges` edges drawn under the request's distance
    /// rule.
    ///
    /// # Errors
    /// Returns [`crate::GenerationError::Capacity`] when fewer distinct pairs
    /// are reachable than requested, position and buffer errors for
    /// malformed requests, and [`crate::GenerationError::GenerationTimeout`]
    /// if sampling stops making progress.
    #[instrument(
        name = "generation.distance_rule",
        err,
        skip(self, request, out),
        fields(
            num_edges = request.num_edges(),
            existing = request.existing().len(),
            rule = %request.rule().decay(),
            scale = f64::from(request.rule().scale()),
            strategy = ?request.strategy(),
            workers = self.worker_count.get(),
            seed = self.master_seed,
            multigraph = self.multigraph,
            directed = self.directed,
        ),
    )]
    pub fn distance_rule(
        &self,
        request: &DistanceRuleRequest<'_>,
        out: &mut [usize],
    ) -> Result<GenerationReport> {
        let mut pool = self.pool()?;
        let report = spatial::generate(&mut pool, request, self.multigraph, out)?;
        info!(
            mode = %report.mode(),
            rounds = report.rounds(),
            trials = report.trials(),
            duplicates = report.duplicates_discarded(),
            "distance-rule generation completed"
        );
        Ok(report)
    }
}
