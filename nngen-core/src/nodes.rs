//! Node id ranges and planar positions.

use crate::{
    error::{GenerationError, Result},
    seed::WorkerStream,
};

/// Inclusive range of node ids `[min, max]`.
///
/// Source and target populations are sampled uniformly over the range
/// spanned by the ids the caller supplies.
///
/// # Examples
/// ```
/// use nngen_core::IdRange;
///
/// let sources = IdRange::spanning(&[4, 2, 7], "source")?;
/// assert_eq!((sources.min(), sources.max(), sources.len()), (2, 7, 6));
/// let targets = IdRange::new(5, 9)?;
/// assert_eq!(sources.overlap(&targets), 3);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IdRange {
    min: usize,
    max: usize,
}

impl IdRange {
    /// Creates the range `[min, max]`.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] when `min > max`.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(GenerationError::invalid(format!(
                "id range minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Returns the range spanned by `ids`.
    ///
    /// # Errors
    /// Returns [`GenerationError::EmptyPopulation`] when `ids` is empty.
    pub fn spanning(ids: &[usize], role: &'static str) -> Result<Self> {
        let min = ids.iter().copied().min();
        let max = ids.iter().copied().max();
        match (min, max) {
            (Some(min), Some(max)) => Ok(Self { min, max }),
            _ => Err(GenerationError::EmptyPopulation { role }),
        }
    }

    #[must_use]
    #[rustfmt::skip]
    pub const fn min(&self) -> usize { self.min }

    #[must_use]
    #[rustfmt::skip]
    pub const fn max(&self) -> usize { self.max }

    /// Number of ids in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.max - self.min + 1
    }

    /// Always `false`; ranges hold at least one id.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub const fn contains(&self, id: usize) -> bool {
        self.min <= id && id <= self.max
    }

    /// Number of ids shared with `other`.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> usize {
        let low = self.min.max(other.min);
        let high = self.max.min(other.max);
        if low > high { 0 } else { high - low + 1 }
    }

    /// Position of `id` inside the range.
    #[must_use]
    pub(crate) const fn offset(&self, id: usize) -> usize {
        id - self.min
    }

    /// Draws a uniform id from the range.
    pub fn sample(&self, stream: &mut WorkerStream) -> usize {
        stream.uniform_id(self.min, self.max)
    }

    /// Number of ordered pairs `(s, t)` with `s` in `self`, `t` in `targets`
    /// and `s != t`, saturating on overflow.
    #[must_use]
    pub fn pair_space(&self, targets: &Self) -> usize {
        self.len()
            .saturating_mul(targets.len())
            .saturating_sub(self.overlap(targets))
    }
}

/// Planar node coordinates stored as two parallel arrays indexed by node id.
///
/// # Examples
/// ```
/// use nngen_core::Positions;
///
/// let x = [0.0, 3.0];
/// let y = [0.0, 4.0];
/// let positions = Positions::new(&x, &y)?;
/// assert_eq!(positions.distance(0, 1), 5.0);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Positions<'a> {
    x: &'a [f32],
    y: &'a [f32],
}

impl<'a> Positions<'a> {
    /// Wraps the coordinate arrays.
    ///
    /// # Errors
    /// Returns [`GenerationError::LengthMismatch`] when the arrays differ in
    /// length.
    pub fn new(x: &'a [f32], y: &'a [f32]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(GenerationError::LengthMismatch {
                what: "positions",
                left: x.len(),
                right: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Number of positioned nodes.
    #[must_use]
    #[rustfmt::skip]
    pub const fn len(&self) -> usize { self.x.len() }

    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.x.is_empty() }

    /// Euclidean distance between nodes `left` and `right`.
    ///
    /// # Panics
    /// Panics when either id has no position; generators validate their
    /// ranges with [`Positions::covers`] before sampling.
    #[must_use]
    pub fn distance(&self, left: usize, right: usize) -> f32 {
        let dx = self.x[left] - self.x[right];
        let dy = self.y[left] - self.y[right];
        dx.hypot(dy)
    }

    /// Coordinates of `node`.
    pub(crate) fn point(&self, node: usize) -> (f32, f32) {
        (self.x[node], self.y[node])
    }

    /// Ensures every id in `range` has a position.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidNodeId`] naming the largest id of
    /// the range when it is out of bounds.
    pub fn covers(&self, range: &IdRange) -> Result<()> {
        if range.max() >= self.len() {
            return Err(GenerationError::InvalidNodeId {
                node: range.max(),
                node_count: self.len(),
            });
        }
        Ok(())
    }
}
