//! Sampling restricted to per-source candidate target lists.

use std::collections::HashSet;

use crate::{
    edges::Edge,
    error::{GenerationError, Result},
    nodes::{IdRange, Positions},
    report::GenerationMode,
    rule::ConnectionRule,
    seed::WorkerStream,
};

use super::{
    grid::CellGrid,
    strategy::{Progress, RoundPlan, SamplingStrategy, WorkerSlot},
};

/// Candidate targets for each source node.
///
/// Lists are normalised on construction: self-loops are dropped and only
/// the first occurrence of a repeated target is kept.
///
/// # Examples
/// ```
/// use nngen_core::CandidateLists;
///
/// let lists = CandidateLists::from_lists([(0, vec![1, 2, 1, 0]), (1, vec![0])]);
/// assert_eq!(lists.len(), 2);
/// assert_eq!(lists.total(), 3);
/// assert_eq!(lists.targets_of(0), Some(&[1, 2][..]));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CandidateLists {
    entries: Vec<(usize, Vec<usize>)>,
    total: usize,
}

impl CandidateLists {
    /// Builds lists from `(source, targets)` pairs.
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = (usize, Vec<usize>)>,
    {
        let mut total = 0;
        let entries = lists
            .into_iter()
            .map(|(source, targets)| {
                let mut seen = HashSet::with_capacity(targets.len());
                let kept: Vec<usize> = targets
                    .into_iter()
                    .filter(|&target| target != source && seen.insert(target))
                    .collect();
                total += kept.len();
                (source, kept)
            })
            .collect();
        Self { entries, total }
    }

    /// Lists, for every source id in `sources`, the targets in `targets`
    /// inside the square box of half-width `rule.reach()` around it.
    ///
    /// Targets are listed in ascending id order.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidNodeId`] when a range extends past
    /// the supplied positions.
    pub fn within_reach(
        sources: IdRange,
        targets: IdRange,
        positions: &Positions<'_>,
        rule: &ConnectionRule,
    ) -> Result<Self> {
        positions.covers(&sources)?;
        positions.covers(&targets)?;
        let reach = rule.reach();
        let grid = CellGrid::new(targets, positions, reach);
        Ok(Self::from_lists((sources.min()..=sources.max()).map(|source| {
            let (sx, sy) = positions.point(source);
            let mut near: Vec<usize> = grid
                .neighbours((sx, sy))
                .filter(|&target| {
                    let (tx, ty) = positions.point(target);
                    target != source && (sx - tx).abs() < reach && (sy - ty).abs() < reach
                })
                .collect();
            near.sort_unstable();
            (source, near)
        })))
    }

    /// Number of source entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of candidates across all sources.
    #[must_use]
    #[rustfmt::skip]
    pub const fn total(&self) -> usize { self.total }

    /// Returns the first list registered for `source`.
    #[must_use]
    pub fn targets_of(&self, source: usize) -> Option<&[usize]> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == source)
            .map(|(_, targets)| targets.as_slice())
    }

    /// Iterates `(source, targets)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.entries
            .iter()
            .map(|(source, targets)| (*source, targets.as_slice()))
    }

    /// Iterates every candidate pair.
    pub fn pairs(&self) -> impl Iterator<Item = Edge> + '_ {
        self.iter()
            .flat_map(|(source, targets)| targets.iter().map(move |&t| Edge::new(source, t)))
    }

    /// Ensures every id has a position.
    pub(crate) fn check_positions(&self, positions: &Positions<'_>) -> Result<()> {
        let node_count = positions.len();
        let out_of_bounds = self
            .pairs()
            .flat_map(|edge| [edge.source(), edge.target()])
            .find(|&node| node >= node_count);
        match out_of_bounds {
            Some(node) => Err(GenerationError::InvalidNodeId { node, node_count }),
            None => Ok(()),
        }
    }
}

/// Spreads each round's shortfall over the lists in proportion to their
/// length; workers take contiguous runs of sources.
pub(crate) struct CandidateStrategy<'a> {
    pub(crate) lists: &'a CandidateLists,
    pub(crate) positions: Positions<'a>,
    pub(crate) rule: ConnectionRule,
}

impl CandidateStrategy<'_> {
    fn trials_for(&self, len: usize, shortfall: usize) -> usize {
        let scaled = len as u128 * shortfall as u128 / self.lists.total.max(1) as u128;
        usize::try_from(scaled).unwrap_or(usize::MAX).max(1)
    }
}

impl SamplingStrategy for CandidateStrategy<'_> {
    fn mode(&self) -> GenerationMode {
        GenerationMode::CandidateList
    }

    fn stage(&self) -> &'static str {
        "candidate_list"
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
        let mut trials = 0_u64;
        let range = slot.range(self.lists.entries.len());
        for (source, targets) in &self.lists.entries[range] {
            if targets.is_empty() {
                continue;
            }
            let draws = self.trials_for(targets.len(), plan.budget);
            trials = trials.saturating_add(draws as u64);
            for _ in 0..draws {
                let target = targets[stream.uniform_id(0, targets.len() - 1)];
                let p = self.rule.probability(self.positions.distance(*source, target));
                if stream.unit() < p {
                    batch.push(Edge::new(*source, target));
                }
            }
        }
        Ok(trials)
    }
}
