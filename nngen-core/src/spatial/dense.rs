//! Precomputed probability table over every `(source, target)` pair.

use rayon::prelude::*;

use crate::{
    edges::Edge,
    error::{GenerationError, Result},
    nodes::{IdRange, Positions},
    report::GenerationMode,
    rule::ConnectionRule,
    seed::WorkerStream,
    workers::WorkerPool,
};

use super::strategy::{Progress, RoundPlan, SamplingStrategy, WorkerSlot};

/// Largest table the automatic strategy choice will allocate.
pub(crate) const DENSE_TABLE_LIMIT: usize = 1 << 26;

/// Draws allowed per quota slot, scaled by the inverse mean probability.
const DRAWS_PER_ACCEPT: f64 = 64.0;

/// Row-major table of acceptance probabilities; rows are sources.
#[derive(Debug)]
pub(crate) struct DenseTable {
    sources: IdRange,
    targets: IdRange,
    probabilities: Vec<f32>,
    mean: f64,
    reachable: usize,
}

impl DenseTable {
    /// Number of entries a table over `sources × targets` would hold.
    pub(crate) fn entries(sources: &IdRange, targets: &IdRange) -> Option<usize> {
        sources.len().checked_mul(targets.len())
    }

    /// Fills the table in parallel, one source row per task.
    pub(crate) fn build(
        pool: &WorkerPool,
        sources: IdRange,
        targets: IdRange,
        positions: &Positions<'_>,
        rule: &ConnectionRule,
    ) -> Result<Self> {
        let entries = Self::entries(&sources, &targets)
            .filter(|&entries| entries <= DENSE_TABLE_LIMIT)
            .ok_or_else(|| {
                GenerationError::invalid(format!(
                    "dense table over {} x {} pairs exceeds {DENSE_TABLE_LIMIT} entries",
                    sources.len(),
                    targets.len()
                ))
            })?;
        let width = targets.len();
        let mut probabilities = vec![0.0_f32; entries];
        let (sum, reachable) = pool.install(|| {
            probabilities
                .par_chunks_mut(width)
                .enumerate()
                .map(|(row, cells)| {
                    let source = sources.min() + row;
                    let mut sum = 0.0_f64;
                    let mut reachable = 0_usize;
                    for (column, cell) in cells.iter_mut().enumerate() {
                        let target = targets.min() + column;
                        if source == target {
                            continue;
                        }
                        let p = rule.probability(positions.distance(source, target));
                        *cell = p;
                        sum += f64::from(p);
                        reachable += usize::from(p > 0.0);
                    }
                    (sum, reachable)
                })
                .reduce(|| (0.0, 0), |left, right| (left.0 + right.0, left.1 + right.1))
        });
        Ok(Self {
            sources,
            targets,
            probabilities,
            mean: sum / entries as f64,
            reachable,
        })
    }

    /// Pairs with a non-zero acceptance probability.
    pub(crate) const fn reachable(&self) -> usize {
        self.reachable
    }

    /// Probability stored for `edge`; zero outside the table.
    pub(crate) fn probability(&self, edge: Edge) -> f32 {
        if !self.sources.contains(edge.source()) || !self.targets.contains(edge.target()) {
            return 0.0;
        }
        let row = self.sources.offset(edge.source());
        let column = self.targets.offset(edge.target());
        self.probabilities[row * self.targets.len() + column]
    }
}

/// Fills each worker's share of the shortfall by Bernoulli trials against
/// the table.
pub(crate) struct DenseStrategy<'t> {
    table: &'t DenseTable,
    draws_per_slot: u64,
}

impl<'t> DenseStrategy<'t> {
    pub(crate) fn new(table: &'t DenseTable) -> Self {
        let draws_per_slot = if table.mean > 0.0 {
            (DRAWS_PER_ACCEPT / table.mean).ceil().min(u64::MAX as f64) as u64
        } else {
            0
        };
        Self {
            table,
            draws_per_slot,
        }
    }
}

impl SamplingStrategy for DenseStrategy<'_> {
    fn mode(&self) -> GenerationMode {
        GenerationMode::DenseTable
    }

    fn stage(&self) -> &'static str {
        "dense_table"
    }

    fn plan(&self, progress: &Progress, _workers: usize) -> RoundPlan {
        RoundPlan {
            budget: progress.shortfall,
        }
    }

    fn sample(
        &self,
        plan: &RoundPlan,
        slot: WorkerSlot,
        stream: &mut WorkerStream,
        batch: &mut Vec<Edge>,
    ) -> Result<u64> {
        let quota = slot.share(plan.budget);
        let budget = (quota as u64).saturating_mul(self.draws_per_slot);
        let mut draws = 0_u64;
        while batch.len() < quota {
            if draws == budget {
                return Err(GenerationError::GenerationTimeout {
                    stage: "dense_table",
                    attempts: draws,
                });
            }
            draws += 1;
            let edge = Edge::new(
                self.table.sources.sample(stream),
                self.table.targets.sample(stream),
            );
            if stream.unit() < self.table.probability(edge) {
                batch.push(edge);
            }
        }
        Ok(draws)
    }
}
