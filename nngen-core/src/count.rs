//! Resolution of requested edge counts.

use crate::error::{GenerationError, Result};

/// How many edges a caller wants, in one of three forms.
///
/// # Examples
/// ```
/// use nngen_core::EdgeCount;
///
/// assert_eq!(EdgeCount::Edges(40).resolve(10, 10, true)?, 40);
/// assert_eq!(EdgeCount::Density(0.5).resolve(10, 10, true)?, 50);
/// assert_eq!(EdgeCount::AverageDegree(4.0).resolve(10, 10, false)?, 20);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeCount {
    /// An explicit number of edges.
    Edges(usize),
    /// Fraction of all `sources × targets` pairs.
    Density(f64),
    /// Mean out-degree over the source population.
    AverageDegree(f64),
}

impl EdgeCount {
    /// Converts the request into an edge count, halving it for undirected
    /// graphs.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] when a density or
    /// average degree is negative or not finite.
    pub fn resolve(self, sources: usize, targets: usize, directed: bool) -> Result<usize> {
        let raw = match self {
            Self::Edges(count) => count as f64,
            Self::Density(density) => {
                ensure_non_negative("density", density)?;
                density * sources as f64 * targets as f64
            }
            Self::AverageDegree(degree) => {
                ensure_non_negative("average degree", degree)?;
                degree * sources as f64
            }
        };
        let count = if directed { raw } else { raw / 2.0 };
        Ok(count.round() as usize)
    }
}

fn ensure_non_negative(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GenerationError::invalid(format!(
            "{what} must be finite and non-negative (got {value})"
        )))
    }
}
