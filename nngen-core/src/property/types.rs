//! Type definitions for generator property tests.

use test_strategy::Arbitrary;

use crate::{DecayRule, DegreeSide, StrategySelection};

/// Shape of the generated point cloud.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum PointLayout {
    /// Points drawn uniformly from the unit square.
    Uniform,
    /// Points grouped tightly around three centres, so many pairs sit at
    /// near-zero distance.
    Clustered,
}

/// Mirror of [`StrategySelection`] that proptest can sample.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum StrategyChoice {
    Auto,
    Dense,
    Sparse,
}

impl StrategyChoice {
    pub(super) const fn selection(self) -> StrategySelection {
        match self {
            Self::Auto => StrategySelection::Auto,
            Self::Dense => StrategySelection::DenseTable,
            Self::Sparse => StrategySelection::SparseOnTheFly,
        }
    }
}

/// Mirror of [`DecayRule`] that proptest can sample.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum DecayChoice {
    Linear,
    Exponential,
}

impl DecayChoice {
    pub(super) const fn decay(self) -> DecayRule {
        match self {
            Self::Linear => DecayRule::Linear,
            Self::Exponential => DecayRule::Exponential,
        }
    }

    /// Maps `unit` in `[0, 1)` onto a scale suited to the unit square:
    /// short linear reach, or an exponential tail spanning the square.
    pub(super) fn scale(self, unit: f32) -> f32 {
        match self {
            Self::Linear => 0.1 + 0.5 * unit,
            Self::Exponential => 0.5 + 1.5 * unit,
        }
    }
}

/// Mirror of [`DegreeSide`] that proptest can sample.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum SideChoice {
    Out,
    In,
}

impl SideChoice {
    pub(super) const fn side(self) -> DegreeSide {
        match self {
            Self::Out => DegreeSide::Out,
            Self::In => DegreeSide::In,
        }
    }
}

/// Input for one degree-sequence property case.
#[derive(Clone, Debug)]
pub(super) struct DegreeFixture {
    /// Node ids acting as both sources and targets.
    pub nodes: Vec<usize>,
    /// Degree requested for each node; always below the node count.
    pub degrees: Vec<usize>,
    pub side: SideChoice,
    pub workers: usize,
    pub seed: u64,
}

/// Input for one distance-rule property case.
#[derive(Clone, Debug)]
pub(super) struct SpatialFixture {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    /// Layout used to draw `x` and `y`, kept for failure diagnosis.
    pub layout: PointLayout,
    /// Exponential decay scale.
    pub scale: f32,
    /// Edges to request; never more than half the ordered pairs.
    pub num_edges: usize,
    pub strategy: StrategyChoice,
    pub workers: usize,
    pub seed: u64,
}

impl SpatialFixture {
    pub(super) fn nodes(&self) -> Vec<usize> {
        (0..self.x.len()).collect()
    }
}

/// Input for one reach-bounded distance-rule case.
#[derive(Clone, Debug)]
pub(super) struct ReachFixture {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub layout: PointLayout,
    pub decay: DecayChoice,
    pub scale: f32,
    /// Share of the likely pairs to request.
    pub fill: f64,
    pub strategy: StrategyChoice,
    /// Restrict sources to candidate lists built from positions.
    pub candidates: bool,
    pub workers: usize,
    pub seed: u64,
}

impl ReachFixture {
    pub(super) fn nodes(&self) -> Vec<usize> {
        (0..self.x.len()).collect()
    }
}
