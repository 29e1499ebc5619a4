//! Per-node complement sampling for the configuration model.

use crate::{
    dedup::DeduplicationIndex,
    error::{GenerationError, Result},
    nodes::IdRange,
    report::Tally,
    seed::WorkerStream,
};

const MIN_ROUND_CAP: u64 = 64;
const ROUNDS_PER_TARGET: u64 = 16;

/// Draws the exact target set satisfying one node's degree.
///
/// Each round draws the remaining shortfall uniformly from the target range,
/// drops self-loops, and (unless multigraph) keeps only ids not returned
/// before. Rounds are capped proportionally to the size of the range.
#[derive(Clone, Copy, Debug)]
pub struct DegreeComplementSampler {
    targets: IdRange,
    multigraph: bool,
    round_cap: u64,
}

impl DegreeComplementSampler {
    /// Creates a sampler drawing from `targets`.
    #[must_use]
    pub fn new(targets: IdRange, multigraph: bool) -> Self {
        let round_cap = (targets.len() as u64)
            .saturating_mul(ROUNDS_PER_TARGET)
            .max(MIN_ROUND_CAP);
        Self {
            targets,
            multigraph,
            round_cap,
        }
    }

    /// Number of distinct targets `node` can reach.
    #[must_use]
    pub const fn pool(&self, node: usize) -> usize {
        self.targets.len() - self.targets.contains(node) as usize
    }

    /// Fills `picks` with exactly `degree` targets for `node`.
    ///
    /// `recorded` lists targets already stored for `node`; it must be empty.
    ///
    /// # Errors
    /// Returns [`GenerationError::PreconditionViolation`] when `recorded` is
    /// non-empty and [`GenerationError::GenerationTimeout`] when the round cap
    /// is exhausted.
    ///
    /// # Examples
    /// ```
    /// use nngen_core::{DegreeComplementSampler, IdRange, SeedManager, Tally};
    ///
    /// let sampler = DegreeComplementSampler::new(IdRange::new(0, 9)?, false);
    /// let mut stream = SeedManager::new(3).streams(1).remove(0);
    /// let mut picks = Vec::new();
    /// let tally: Tally = sampler.sample(4, 5, &[], &mut stream, &mut picks)?;
    /// assert_eq!(picks.len(), 5);
    /// assert!(tally.trials() >= 5);
    /// # Ok::<(), nngen_core::GenerationError>(())
    /// ```
    pub fn sample(
        &self,
        node: usize,
        degree: usize,
        recorded: &[usize],
        stream: &mut WorkerStream,
        picks: &mut Vec<usize>,
    ) -> Result<Tally> {
        if !recorded.is_empty() {
            return Err(GenerationError::PreconditionViolation {
                node,
                recorded: recorded.len(),
            });
        }
        picks.clear();
        let mut tally = Tally::default();
        let mut index = DeduplicationIndex::new();
        while picks.len() < degree {
            if tally.rounds == self.round_cap {
                return Err(GenerationError::GenerationTimeout {
                    stage: "degree_complement",
                    attempts: tally.rounds,
                });
            }
            tally.rounds += 1;
            let shortfall = degree - picks.len();
            tally.trials += shortfall as u64;
            for _ in 0..shortfall {
                let target = self.targets.sample(stream);
                if target != node {
                    picks.push(target);
                }
            }
            if !self.multigraph {
                let drawn = picks.len();
                let unique = index.compact(picks, Some(degree));
                tally.duplicates += (drawn - unique) as u64;
            }
        }
        Ok(tally)
    }
}
