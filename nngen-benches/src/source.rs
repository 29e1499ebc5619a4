//! Seeded synthetic point layouts for benchmarking.
//!
//! Points are drawn uniformly from a square so that benchmark inputs are
//! identical across runs.

use nngen_core::{GenerationError, Positions};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during layout generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The square side was zero, negative, or not finite.
    #[error("side length must be finite and positive")]
    InvalidSide,
}

/// Configuration for a synthetic layout.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Side length of the square the points fall in.
    pub side: f32,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Uniform points on a square.
///
/// # Examples
///
/// ```
/// use nngen_benches::source::{LayoutConfig, SyntheticLayout};
///
/// let config = LayoutConfig { point_count: 10, side: 1.0, seed: 42 };
/// let layout = SyntheticLayout::generate(&config).expect("valid config");
/// assert_eq!(layout.len(), 10);
/// assert_eq!(layout.nodes().len(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct SyntheticLayout {
    x: Vec<f32>,
    y: Vec<f32>,
    side: f32,
}

impl SyntheticLayout {
    /// Generates the points eagerly from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntheticError::ZeroPoints`] if `point_count` is zero, or
    /// [`SyntheticError::InvalidSide`] if `side` is not a positive finite
    /// number.
    pub fn generate(config: &LayoutConfig) -> Result<Self, SyntheticError> {
        if config.point_count == 0 {
            return Err(SyntheticError::ZeroPoints);
        }
        if !(config.side.is_finite() && config.side > 0.0) {
            return Err(SyntheticError::InvalidSide);
        }
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let (x, y) = (0..config.point_count)
            .map(|_| {
                (
                    rng.gen_range(0.0..config.side),
                    rng.gen_range(0.0..config.side),
                )
            })
            .unzip();
        Ok(Self {
            x,
            y,
            side: config.side,
        })
    }

    /// Number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.x.len()
    }

    /// Always `false`; generation rejects empty layouts.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Node ids `0..len`.
    #[must_use]
    pub fn nodes(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    /// Area of the enclosing square.
    #[must_use]
    pub fn area(&self) -> f32 {
        self.side.powi(2)
    }

    /// Borrows the coordinates as generator positions.
    ///
    /// # Errors
    ///
    /// Never fails for a generated layout; the coordinate arrays always
    /// match.
    pub fn positions(&self) -> Result<Positions<'_>, GenerationError> {
        Positions::new(&self.x, &self.y)
    }
}
