//! On-the-fly sampling: distance and probability are computed per draw.

use crate::{
    edges::Edge,
    error::Result,
    nodes::{IdRange, Positions},
    report::GenerationMode,
    rule::{ConnectionRule, connection_probability},
    seed::WorkerStream,
};

use super::{
    estimate::TrialEstimate,
    strategy::{Progress, RoundPlan, SamplingStrategy, WorkerSlot},
};

/// Upper bound on the trials planned for a single round.
pub(crate) const MAX_TESTS_PER_ROUND: usize = 1 << 22;

pub(crate) struct SparseStrategy<'a> {
    pub(crate) sources: IdRange,
    pub(crate) targets: IdRange,
    pub(crate) positions: Positions<'a>,
    pub(crate) rule: ConnectionRule,
    pub(crate) estimate: TrialEstimate,
    /// Distinct pairs with a non-zero acceptance probability.
    pub(crate) reachable: usize,
    /// Existing edges already occupying part of the reachable pairs.
    pub(crate) occupied: usize,
    pub(crate) multigraph: bool,
}

impl SparseStrategy<'_> {
    /// Fraction of the reachable pairs not yet taken by confirmed edges.
    fn free_fraction(&self, accepted: usize) -> f64 {
        if self.multigraph || self.reachable == 0 {
            return 1.0;
        }
        let space = self.reachable as f64;
        let taken = (self.occupied + accepted) as f64;
        (1.0 - taken / space).max(space.recip())
    }

    fn next_tests(&self, progress: &Progress) -> f64 {
        if progress.round == 0 {
            return self.estimate.num_tests();
        }
        let rate = if progress.last_hits > 0 && progress.last_trials > 0 {
            progress.last_hits as f64 / progress.last_trials as f64
        } else {
            self.estimate.avg_probability()
        };
        if rate <= 0.0 {
            return progress.last_trials as f64 * 2.0;
        }
        progress.shortfall as f64 / rate / self.free_fraction(progress.accepted)
    }
}

impl SamplingStrategy for SparseStrategy<'_> {
    fn mode(&self) -> GenerationMode {
        GenerationMode::SparseOnTheFly
    }

    fn stage(&self) -> &'static str {
        "sparse_on_the_fly"
    }

    fn plan(&self, progress: &Progress, workers: usize) -> RoundPlan {
        let tests = self.next_tests(progress).ceil();
        let budget = if tests.is_finite() && tests < MAX_TESTS_PER_ROUND as f64 {
            tests as usize
        } else {
            MAX_TESTS_PER_ROUND
        };
        RoundPlan {
            budget: budget.clamp(workers.min(MAX_TESTS_PER_ROUND), MAX_TESTS_PER_ROUND),
        }
    }

    fn sample(
        &self,
        plan: &RoundPlan,
        slot: WorkerSlot,
        stream: &mut WorkerStream,
        batch: &mut Vec<Edge>,
    ) -> Result<u64> {
        let trials = slot.share(plan.budget);
        let inv_scale = self.rule.inv_scale();
        for _ in 0..trials {
            let source = self.sources.sample(stream);
            let target = self.targets.sample(stream);
            if source == target {
                continue;
            }
            let distance = self.positions.distance(source, target);
            let p = connection_probability(self.rule.decay(), inv_scale, distance);
            if stream.unit() < p {
                batch.push(Edge::new(source, target));
            }
        }
        Ok(trials as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rule::DecayRule, seed::SeedManager};
    use rstest::rstest;

    static X: [f32; 3] = [0.0, 0.5, 9.0];
    static Y: [f32; 3] = [0.0; 3];

    fn strategy(multigraph: bool) -> SparseStrategy<'static> {
        let range = IdRange::new(0, 2).expect("range");
        let rule = ConnectionRule::new(DecayRule::Linear, 1.0, 1.0, 3).expect("rule");
        SparseStrategy {
            sources: range,
            targets: range,
            positions: Positions::new(&X, &Y).expect("positions"),
            rule,
            estimate: TrialEstimate::new(&rule, 2, 0),
            reachable: 2,
            occupied: 0,
            multigraph,
        }
    }

    #[test]
    fn first_round_uses_the_estimate() {
        let strategy = strategy(false);
        let plan = strategy.plan(&Progress::default(), 2);
        assert_eq!(plan.budget, strategy.estimate.num_tests().ceil() as usize);
    }

    #[rstest]
    #[case(false, 16)]
    #[case(true, 8)]
    fn later_rounds_follow_the_measured_rate(#[case] multigraph: bool, #[case] expected: usize) {
        let strategy = strategy(multigraph);
        let progress = Progress {
            round: 1,
            accepted: 1,
            shortfall: 2,
            last_trials: 40,
            last_hits: 10,
        };
        assert_eq!(strategy.plan(&progress, 1).budget, expected);
    }

    #[test]
    fn silent_rounds_double_the_trials() {
        let strategy = SparseStrategy {
            estimate: TrialEstimate::new(
                &ConnectionRule::new(DecayRule::Linear, 0.01, 100.0, 3).expect("rule"),
                1,
                0,
            ),
            ..strategy(false)
        };
        let progress = Progress {
            round: 2,
            accepted: 0,
            shortfall: 1,
            last_trials: 50,
            last_hits: 0,
        };
        assert_eq!(strategy.plan(&progress, 1).budget, 100);
    }

    #[test]
    fn accepted_pairs_are_never_self_loops_or_out_of_reach() {
        let strategy = strategy(false);
        let mut stream = SeedManager::new(12).streams(1).remove(0);
        let mut batch = Vec::new();
        let trials = strategy
            .sample(
                &RoundPlan { budget: 500 },
                WorkerSlot { index: 0, count: 1 },
                &mut stream,
                &mut batch,
            )
            .expect("sampling succeeds");
        assert_eq!(trials, 500);
        assert!(!batch.is_empty());
        for edge in &batch {
            assert!(!edge.is_self_loop());
            assert!(edge.source() != 2 && edge.target() != 2);
        }
    }
}
