//! Summary returned by each generation call.

use std::fmt;

/// Generation path that produced the new edges.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum GenerationMode {
    /// Configuration model driven by per-node degrees.
    DegreeSequence,
    /// Distance rule sampled against a precomputed probability table.
    DenseTable,
    /// Distance rule with probabilities computed per draw.
    SparseOnTheFly,
    /// Distance rule restricted to per-source candidate lists.
    CandidateList,
}

impl GenerationMode {
    /// Returns a stable lowercase label, used in tracing fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DegreeSequence => "degree_sequence",
            Self::DenseTable => "dense_table",
            Self::SparseOnTheFly => "sparse_on_the_fly",
            Self::CandidateList => "candidate_list",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters describing how a generation call reached its target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GenerationReport {
    mode: GenerationMode,
    rounds: u64,
    trials: u64,
    duplicates_discarded: u64,
}

impl GenerationReport {
    pub(crate) const fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            rounds: 0,
            trials: 0,
            duplicates_discarded: 0,
        }
    }

    /// Returns the generation path used.
    #[must_use]
    #[rustfmt::skip]
    pub const fn mode(&self) -> GenerationMode { self.mode }

    /// Returns the number of sampling rounds.
    #[must_use]
    #[rustfmt::skip]
    pub const fn rounds(&self) -> u64 { self.rounds }

    /// Returns the number of random draws made across all workers.
    #[must_use]
    #[rustfmt::skip]
    pub const fn trials(&self) -> u64 { self.trials }

    /// Returns the number of accepted candidates dropped as duplicates.
    #[must_use]
    #[rustfmt::skip]
    pub const fn duplicates_discarded(&self) -> u64 { self.duplicates_discarded }

    pub(crate) fn record_round(&mut self, trials: u64, duplicates: u64) {
        self.rounds += 1;
        self.trials = self.trials.saturating_add(trials);
        self.duplicates_discarded = self.duplicates_discarded.saturating_add(duplicates);
        record_round_metrics(trials, duplicates);
    }

    /// Folds a worker's counters gathered outside the round loop.
    pub(crate) fn absorb(&mut self, tally: Tally) {
        self.rounds = self.rounds.max(tally.rounds);
        self.trials = self.trials.saturating_add(tally.trials);
        self.duplicates_discarded = self.duplicates_discarded.saturating_add(tally.duplicates);
        record_worker_metrics(tally.trials, tally.duplicates);
    }
}

/// Sampling counters gathered by one worker or one sampler call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Tally {
    pub(crate) rounds: u64,
    pub(crate) trials: u64,
    pub(crate) duplicates: u64,
}

impl Tally {
    #[must_use]
    #[rustfmt::skip]
    pub const fn rounds(&self) -> u64 { self.rounds }

    #[must_use]
    #[rustfmt::skip]
    pub const fn trials(&self) -> u64 { self.trials }

    /// Repeated draws discarded by deduplication.
    #[must_use]
    #[rustfmt::skip]
    pub const fn duplicates(&self) -> u64 { self.duplicates }

    pub(crate) fn merge(&mut self, other: Self) {
        self.rounds = self.rounds.max(other.rounds);
        self.trials = self.trials.saturating_add(other.trials);
        self.duplicates = self.duplicates.saturating_add(other.duplicates);
    }
}

#[cfg(feature = "metrics")]
fn record_round_metrics(trials: u64, duplicates: u64) {
    metrics::counter!("edge_generation_rounds").increment(1);
    metrics::counter!("edge_generation_trials").increment(trials);
    metrics::counter!("edge_generation_duplicates_discarded").increment(duplicates);
}

#[cfg(not(feature = "metrics"))]
fn record_round_metrics(_trials: u64, _duplicates: u64) {}

#[cfg(feature = "metrics")]
fn record_worker_metrics(trials: u64, duplicates: u64) {
    metrics::counter!("edge_generation_trials").increment(trials);
    metrics::counter!("edge_generation_duplicates_discarded").increment(duplicates);
}

#[cfg(not(feature = "metrics"))]
fn record_worker_metrics(_trials: u64, _duplicates: u64) {}
