//! Shared round loop driving every distance-rule sampling strategy.
//!
//! A round asks each worker for one bounded batch of accepted candidates,
//! appends the batches in worker order behind the confirmed edges, and
//! compacts the result. Rounds repeat until the target count is reached or
//! the stall budget of rounds or trials runs out.

use std::ops::Range;

use tracing::debug;

use crate::{
    dedup::DeduplicationIndex,
    edges::{Edge, ExistingEdges},
    error::{GenerationError, Result},
    report::{GenerationMode, GenerationReport},
    seed::WorkerStream,
    workers::WorkerPool,
};

/// Counters visible to a strategy when it plans the next round.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Progress {
    /// Rounds completed so far.
    pub(crate) round: u64,
    /// New edges confirmed unique so far.
    pub(crate) accepted: usize,
    /// New edges still required.
    pub(crate) shortfall: usize,
    /// Trials drawn in the previous round.
    pub(crate) last_trials: u64,
    /// Candidates accepted in the previous round, before deduplication.
    pub(crate) last_hits: u64,
}

/// Work assigned to the whole pool for one round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RoundPlan {
    /// Strategy-specific amount: accepted edges for quota strategies,
    /// trials for the sparse strategy.
    pub(crate) budget: usize,
}

/// A worker's position within the pool.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WorkerSlot {
    pub(crate) index: usize,
    pub(crate) count: usize,
}

impl WorkerSlot {
    /// This worker's part of `total`; parts differ by at most one.
    pub(crate) const fn share(&self, total: usize) -> usize {
        total / self.count + (self.index < total % self.count) as usize
    }

    /// This worker's contiguous slice of `0..len`.
    pub(crate) const fn range(&self, len: usize) -> Range<usize> {
        let base = len / self.count;
        let remainder = len % self.count;
        let extra = if self.index < remainder {
            self.index
        } else {
            remainder
        };
        let start = self.index * base + extra;
        start..start + self.share(len)
    }
}

/// One way of turning random draws into accepted edges.
pub(crate) trait SamplingStrategy: Sync {
    /// Generation path reported to callers.
    fn mode(&self) -> GenerationMode;

    /// Stage name used when the strategy gives up.
    fn stage(&self) -> &'static str;

    /// Sizes the next round.
    fn plan(&self, progress: &Progress, workers: usize) -> RoundPlan;

    /// Appends accepted candidates to `batch` and returns the trials drawn.
    fn sample(
        &self,
        plan: &RoundPlan,
        slot: WorkerSlot,
        stream: &mut WorkerStream,
        batch: &mut Vec<Edge>,
    ) -> Result<u64>;
}

/// Target and limits for one run of the round loop.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RoundLimits {
    pub(crate) num_edges: usize,
    pub(crate) multigraph: bool,
    /// Consecutive rounds allowed without a new unique edge.
    pub(crate) stall_cap: u64,
    /// Trials allowed across those rounds.
    pub(crate) stall_trials: u64,
}

/// Runs rounds until `limits.num_edges` new edges follow `existing`.
///
/// Returns the existing prefix followed by the new edges.
pub(crate) fn run_rounds<S: SamplingStrategy>(
    strategy: &S,
    pool: &mut WorkerPool,
    existing: ExistingEdges<'_>,
    limits: RoundLimits,
) -> Result<(Vec<Edge>, GenerationReport)> {
    let prefix = existing.len();
    let goal = prefix + limits.num_edges;
    let mut working: Vec<Edge> = Vec::with_capacity(goal);
    working.extend(existing.iter());
    let mut index = DeduplicationIndex::seeded(&working);
    let mut report = GenerationReport::new(strategy.mode());
    let mut progress = Progress {
        shortfall: limits.num_edges,
        ..Progress::default()
    };
    let workers = pool.worker_count();
    let mut stalled = 0_u64;
    let mut stalled_trials = 0_u64;

    while progress.shortfall > 0 {
        let plan = strategy.plan(&progress, workers);
        let batches = pool.round(|stream| {
            let slot = WorkerSlot {
                index: stream.index(),
                count: workers,
            };
            let mut batch = Vec::new();
            let trials = strategy.sample(&plan, slot, stream, &mut batch)?;
            Ok((batch, trials))
        })?;

        let mut trials = 0_u64;
        let mut hits = 0_u64;
        for (batch, batch_trials) in batches {
            trials = trials.saturating_add(batch_trials);
            hits += batch.len() as u64;
            working.extend(batch);
        }

        let duplicates_before = index.duplicates_seen();
        let unique = if limits.multigraph {
            working.truncate(goal);
            working.len()
        } else {
            index.compact(&mut working, Some(goal))
        };
        let duplicates = index.duplicates_seen() - duplicates_before;
        report.record_round(trials, duplicates);

        let gained = unique - (prefix + progress.accepted);
        progress = Progress {
            round: progress.round + 1,
            accepted: unique - prefix,
            shortfall: goal - unique,
            last_trials: trials,
            last_hits: hits,
        };
        debug!(
            round = progress.round,
            trials,
            hits,
            gained,
            accepted = progress.accepted,
            shortfall = progress.shortfall,
            "sampling round complete"
        );

        if gained == 0 {
            stalled += 1;
            stalled_trials = stalled_trials.saturating_add(trials);
            if stalled >= limits.stall_cap || stalled_trials >= limits.stall_trials {
                return Err(GenerationError::GenerationTimeout {
                    stage: strategy.stage(),
                    attempts: progress.round,
                });
            }
        } else {
            stalled = 0;
            stalled_trials = 0;
        }
    }
    Ok((working, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedManager;
    use rstest::rstest;

    #[rstest]
    #[case(10, 3)]
    #[case(2, 4)]
    #[case(0, 2)]
    #[case(17, 5)]
    fn slot_ranges_tile_the_input(#[case] len: usize, #[case] count: usize) {
        let ranges: Vec<_> = (0..count)
            .map(|index| WorkerSlot { index, count }.range(len))
            .collect();
        assert_eq!(ranges, crate::partition::contiguous_ranges(len, count));
    }

    /// Emits a fixed cycle of edges so duplicate handling is predictable.
    struct Cycle {
        edges: Vec<Edge>,
    }

    impl SamplingStrategy for Cycle {
        fn mode(&self) -> GenerationMode {
            GenerationMode::SparseOnTheFly
        }

        fn stage(&self) -> &'static str {
            "cycle"
        }

        fn plan(&self, progress: &Progress, _workers: usize) -> RoundPlan {
            RoundPlan {
                budget: progress.round as usize,
            }
        }

        fn sample(
            &self,
            plan: &RoundPlan,
            slot: WorkerSlot,
            _stream: &mut WorkerStream,
            batch: &mut Vec<Edge>,
        ) -> Result<u64> {
            if slot.index == 0 {
                let take = (plan.budget + 1).min(self.edges.len());
                batch.extend_from_slice(&self.edges[..take]);
            }
            Ok(1)
        }
    }

    fn pool(workers: usize) -> WorkerPool {
        WorkerPool::new(SeedManager::new(0), workers).expect("pool builds")
    }

    #[test]
    fn rounds_stop_exactly_at_the_target() {
        let strategy = Cycle {
            edges: vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(2, 3)],
        };
        let limits = RoundLimits {
            num_edges: 2,
            multigraph: false,
            stall_cap: 8,
            stall_trials: u64::MAX,
        };
        let (edges, report) =
            run_rounds(&strategy, &mut pool(2), ExistingEdges::empty(), limits).expect("rounds");
        assert_eq!(edges, [Edge::new(0, 1), Edge::new(1, 2)]);
        assert_eq!(report.rounds(), 2);
        assert_eq!(report.trials(), 4);
    }

    #[test]
    fn existing_edges_are_never_resampled() {
        let strategy = Cycle {
            edges: vec![Edge::new(0, 1), Edge::new(1, 2)],
        };
        let sources = [0];
        let targets = [1];
        let existing = ExistingEdges::new(&sources, &targets).expect("existing");
        let limits = RoundLimits {
            num_edges: 1,
            multigraph: false,
            stall_cap: 8,
            stall_trials: u64::MAX,
        };
        let (edges, report) = run_rounds(&strategy, &mut pool(1), existing, limits).expect("rounds");
        assert_eq!(edges, [Edge::new(0, 1), Edge::new(1, 2)]);
        assert_eq!(report.duplicates_discarded(), 2);
    }

    #[test]
    fn rounds_without_progress_time_out() {
        let strategy = Cycle {
            edges: vec![Edge::new(0, 1)],
        };
        let limits = RoundLimits {
            num_edges: 2,
            multigraph: false,
            stall_cap: 5,
            stall_trials: u64::MAX,
        };
        let err = run_rounds(&strategy, &mut pool(1), ExistingEdges::empty(), limits)
            .expect_err("only one distinct edge exists");
        assert_eq!(
            err,
            GenerationError::GenerationTimeout {
                stage: "cycle",
                attempts: 6,
            }
        );
    }

    #[test]
    fn stalled_trials_time_out_before_the_round_cap() {
        let strategy = Cycle {
            edges: vec![Edge::new(0, 1)],
        };
        let limits = RoundLimits {
            num_edges: 2,
            multigraph: false,
            stall_cap: u64::MAX,
            stall_trials: 3,
        };
        let err = run_rounds(&strategy, &mut pool(1), ExistingEdges::empty(), limits)
            .expect_err("only one distinct edge exists");
        assert_eq!(
            err,
            GenerationError::GenerationTimeout {
                stage: "cycle",
                attempts: 4,
            }
        );
    }

    #[test]
    fn multigraph_keeps_repeats() {
        let strategy = Cycle {
            edges: vec![Edge::new(0, 1)],
        };
        let limits = RoundLimits {
            num_edges: 3,
            multigraph: true,
            stall_cap: 5,
            stall_trials: u64::MAX,
        };
        let (edges, _) =
            run_rounds(&strategy, &mut pool(1), ExistingEdges::empty(), limits).expect("rounds");
        assert_eq!(edges, [Edge::new(0, 1); 3]);
    }
}
