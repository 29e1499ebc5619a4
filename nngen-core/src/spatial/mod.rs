//! Spatial generation under a distance-decay connection rule.
//!
//! A request is turned into one of three sampling strategies (dense table,
//! sparse on-the-fly draws, or candidate lists) after an analytic capacity
//! check, and the chosen strategy is driven by the shared round loop until
//! the exact number of new edges has been confirmed.

mod candidates;
mod dense;
mod estimate;
mod grid;
mod sparse;
mod strategy;


pub use candidates::CandidateLists;
pub use estimate::TrialEstimate;

use std::collections::HashSet;

use tracing::warn;

use crate::{
    edges::{Edge, ExistingEdges, check_buffer, expected_buffer_len},
    error::{GenerationError, Result},
    nodes::{IdRange, Positions},
    report::GenerationReport,
    rule::ConnectionRule,
    workers::WorkerPool,
};

use self::{
    candidates::CandidateStrategy,
    dense::{DENSE_TABLE_LIMIT, DenseStrategy, DenseTable},
    grid::reachable_pairs,
    sparse::SparseStrategy,
    strategy::{RoundLimits, SamplingStrategy, run_rounds},
};

const MIN_STALL_ROUNDS: u64 = 1_024;
const STALL_ROUNDS_PER_PAIR: u64 = 16;
const MIN_STALL_TRIALS: u64 = 1 << 24;
const STALL_TRIALS_PER_PAIR: u64 = 64;

/// Forces the dense or sparse strategy instead of the estimate's choice.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum StrategySelection {
    /// Pick from the trial estimate.
    #[default]
    Auto,
    /// Always precompute the probability table.
    DenseTable,
    /// Always compute probabilities per draw.
    SparseOnTheFly,
}

/// Parameters of one distance-rule generation call.
///
/// # Examples
/// ```
/// use nngen_core::{ConnectionRule, DecayRule, DistanceRuleRequest, Positions};
///
/// let x = [0.0, 0.1, 0.2];
/// let y = [0.0, 0.0, 0.0];
/// let nodes = [0, 1, 2];
/// let rule = ConnectionRule::new(DecayRule::Exponential, 0.5, 1.0, 3)?;
/// let request = DistanceRuleRequest::new(&nodes, &nodes, Positions::new(&x, &y)?, rule, 4);
/// assert_eq!(request.buffer_len()?, 8);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DistanceRuleRequest<'a> {
    sources: &'a [usize],
    targets: &'a [usize],
    positions: Positions<'a>,
    rule: ConnectionRule,
    num_edges: usize,
    existing: ExistingEdges<'a>,
    candidates: Option<&'a CandidateLists>,
    strategy: StrategySelection,
}

impl<'a> DistanceRuleRequest<'a> {
    /// Requests `num_edges` new edges between the id ranges spanned by
    /// `sources` and `targets`.
    #[must_use]
    pub const fn new(
        sources: &'a [usize],
        targets: &'a [usize],
        positions: Positions<'a>,
        rule: ConnectionRule,
        num_edges: usize,
    ) -> Self {
        Self {
            sources,
            targets,
            positions,
            rule,
            num_edges,
            existing: ExistingEdges::empty(),
            candidates: None,
            strategy: StrategySelection::Auto,
        }
    }

    /// Sets the edges already present in the output prefix.
    #[must_use]
    pub const fn with_existing(mut self, existing: ExistingEdges<'a>) -> Self {
        self.existing = existing;
        self
    }

    /// Restricts every source to its candidate list.
    #[must_use]
    pub const fn with_candidates(mut self, candidates: &'a CandidateLists) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Overrides the dense/sparse choice.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: StrategySelection) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    #[rustfmt::skip]
    pub const fn num_edges(&self) -> usize { self.num_edges }

    #[must_use]
    #[rustfmt::skip]
    pub const fn rule(&self) -> &ConnectionRule { &self.rule }

    #[must_use]
    #[rustfmt::skip]
    pub const fn existing(&self) -> ExistingEdges<'a> { self.existing }

    #[must_use]
    #[rustfmt::skip]
    pub const fn strategy(&self) -> StrategySelection { self.strategy }

    /// Pairs the output buffer holds: existing plus requested edges.
    #[must_use]
    pub const fn output_edges(&self) -> usize {
        self.existing.len().saturating_add(self.num_edges)
    }

    /// Length the output buffer must have.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] on overflow.
    pub fn buffer_len(&self) -> Result<usize> {
        expected_buffer_len(self.existing.len(), self.num_edges)
    }

    /// First-round trial estimate for this request.
    #[must_use]
    pub fn estimate(&self) -> TrialEstimate {
        TrialEstimate::new(&self.rule, self.num_edges, self.existing.len())
    }
}

/// Counts distinct existing edges for which `inside` holds.
fn distinct_existing(existing: ExistingEdges<'_>, inside: impl Fn(Edge) -> bool) -> usize {
    existing
        .iter()
        .filter(|&edge| !edge.is_self_loop() && inside(edge))
        .collect::<HashSet<_>>()
        .len()
}

/// Reachable pairs, the share already held by existing edges, and the
/// pairs a strategy draws from.
#[derive(Clone, Copy, Debug)]
struct Space {
    reachable: usize,
    occupied: usize,
    sampled: usize,
}

impl Space {
    fn check(self, requested: usize, multigraph: bool) -> Result<Self> {
        let available = if multigraph {
            if self.reachable == 0 { 0 } else { requested }
        } else {
            self.reachable.saturating_sub(self.occupied)
        };
        if requested > available {
            warn!(requested, available, "edge request exceeds reachable pairs");
            return Err(GenerationError::Capacity {
                requested,
                available,
            });
        }
        Ok(self)
    }

    fn stall_cap(self) -> u64 {
        (self.reachable as u64)
            .saturating_mul(STALL_ROUNDS_PER_PAIR)
            .max(MIN_STALL_ROUNDS)
    }

    fn stall_trials(self) -> u64 {
        (self.sampled as u64)
            .saturating_mul(STALL_TRIALS_PER_PAIR)
            .max(MIN_STALL_TRIALS)
    }
}

fn drive<S: SamplingStrategy>(
    strategy: &S,
    pool: &mut WorkerPool,
    request: &DistanceRuleRequest<'_>,
    space: Space,
    multigraph: bool,
    out: &mut [usize],
) -> Result<GenerationReport> {
    let limits = RoundLimits {
        num_edges: request.num_edges,
        multigraph,
        stall_cap: space.stall_cap(),
        stall_trials: space.stall_trials(),
    };
    let (edges, report) = run_rounds(strategy, pool, request.existing, limits)?;
    for (pair, edge) in out.chunks_exact_mut(2).zip(edges) {
        pair[0] = edge.source();
        pair[1] = edge.target();
    }
    Ok(report)
}

pub(crate) fn generate(
    pool: &mut WorkerPool,
    request: &DistanceRuleRequest<'_>,
    multigraph: bool,
    out: &mut [usize],
) -> Result<GenerationReport> {
    check_buffer(out, request.existing.len(), request.num_edges)?;
    let positions = request.positions;

    if let Some(lists) = request.candidates {
        lists.check_positions(&positions)?;
        let reachable: HashSet<Edge> = lists
            .pairs()
            .filter(|&edge| {
                let distance = positions.distance(edge.source(), edge.target());
                request.rule.probability(distance) > 0.0
            })
            .collect();
        let space = Space {
            reachable: reachable.len(),
            occupied: distinct_existing(request.existing, |edge| reachable.contains(&edge)),
            sampled: lists.total(),
        }
        .check(request.num_edges, multigraph)?;
        let strategy = CandidateStrategy {
            lists,
            positions,
            rule: request.rule,
        };
        return drive(&strategy, pool, request, space, multigraph, out);
    }

    let sources = IdRange::spanning(request.sources, "source")?;
    let targets = IdRange::spanning(request.targets, "target")?;
    positions.covers(&sources)?;
    positions.covers(&targets)?;
    let rule = request.rule;
    let space = Space {
        reachable: reachable_pairs(pool, sources, targets, &positions, &rule),
        occupied: distinct_existing(request.existing, |edge| {
            sources.contains(edge.source())
                && targets.contains(edge.target())
                && rule.probability(positions.distance(edge.source(), edge.target())) > 0.0
        }),
        sampled: sources.pair_space(&targets),
    }
    .check(request.num_edges, multigraph)?;

    let estimate = request.estimate();
    let dense = match request.strategy {
        StrategySelection::Auto => {
            estimate.prefers_dense()
                && DenseTable::entries(&sources, &targets)
                    .is_some_and(|entries| entries <= DENSE_TABLE_LIMIT)
        }
        StrategySelection::DenseTable => true,
        StrategySelection::SparseOnTheFly => false,
    };

    if dense {
        let table = DenseTable::build(pool, sources, targets, &positions, &rule)?;
        // Exponential tails can underflow to zero inside the table.
        let space = Space {
            reachable: table.reachable(),
            ..space
        }
        .check(request.num_edges, multigraph)?;
        let strategy = DenseStrategy::new(&table);
        return drive(&strategy, pool, request, space, multigraph, out);
    }

    let strategy = SparseStrategy {
        sources,
        targets,
        positions,
        rule,
        estimate,
        reachable: space.reachable,
        occupied: space.occupied,
        multigraph,
    };
    drive(&strategy, pool, request, space, multigraph, out)
}
