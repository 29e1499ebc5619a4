//! Up-front estimate of the number of trials a distance rule needs.

use std::f64::consts::FRAC_PI_2;

use crate::rule::ConnectionRule;

/// Expected acceptance rate and first-round trial count for a rule.
///
/// The typical pair distance is taken as `sqrt(area)` scaled by
/// `sqrt(pi / 2)`; the probability at that distance stands in for the mean
/// acceptance rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialEstimate {
    avg_probability: f64,
    pairs: f64,
    num_tests: f64,
}

impl TrialEstimate {
    /// Estimates the trials needed to accept `num_edges` new edges when
    /// `existing` edges are already present.
    #[must_use]
    pub fn new(rule: &ConnectionRule, num_edges: usize, existing: usize) -> Self {
        let typical = f64::from(rule.area()).sqrt();
        let avg_distance = typical * FRAC_PI_2.sqrt();
        let avg_probability = f64::from(rule.probability(avg_distance as f32));
        let population = rule.population() as f64;
        let pairs = population * (population - 1.0);
        let critical = num_edges as f64 / pairs;
        let mut num_tests = if avg_probability <= critical {
            pairs
        } else {
            num_edges as f64 / avg_probability
        };
        if existing > 0 {
            num_tests *= (1.0 - existing as f64 / pairs).max(0.0);
        }
        Self {
            avg_probability,
            pairs,
            num_tests,
        }
    }

    /// Acceptance probability at the typical distance.
    #[must_use]
    #[rustfmt::skip]
    pub const fn avg_probability(&self) -> f64 { self.avg_probability }

    /// Ordered pairs in the calibration population, `N (N - 1)`.
    #[must_use]
    #[rustfmt::skip]
    pub const fn pairs(&self) -> f64 { self.pairs }

    /// Trials planned for the first round.
    #[must_use]
    #[rustfmt::skip]
    pub const fn num_tests(&self) -> f64 { self.num_tests }

    /// `true` when sampling is expected to cost at least one trial per pair,
    /// making a precomputed probability table worthwhile.
    #[must_use]
    pub fn prefers_dense(&self) -> bool {
        self.num_tests >= self.pairs
    }
}
