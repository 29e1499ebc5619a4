//! Benchmark parameter types, rendered as Criterion benchmark ids.

use std::fmt;

use nngen_core::{DecayRule, StrategySelection};

/// Parameters for a degree-sequence benchmark run.
#[derive(Clone, Debug)]
pub struct DegreeBenchParams {
    /// Number of source (and target) nodes.
    pub node_count: usize,
    /// Out-degree given to every node.
    pub degree: usize,
    /// Worker pool size.
    pub workers: usize,
}

impl fmt::Display for DegreeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},k={},w={}",
            self.node_count, self.degree, self.workers
        )
    }
}

/// Parameters for a distance-rule benchmark run.
#[derive(Clone, Debug)]
pub struct SpatialBenchParams {
    /// Number of points in the layout.
    pub point_count: usize,
    /// Edges requested per call.
    pub edges: usize,
    /// Decay shape of the rule.
    pub decay: DecayRule,
    /// Forced strategy.
    pub strategy: StrategySelection,
    /// Worker pool size.
    pub workers: usize,
}

impl fmt::Display for SpatialBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={},e={},{},{:?},w={}",
            self.point_count, self.edges, self.decay, self.strategy, self.workers
        )
    }
}
