//! Benchmark setup error type.

use nngen_core::GenerationError;

use crate::source::SyntheticError;

/// Errors that may occur while preparing a benchmark input.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic layout generation failed.
    #[error("synthetic layout generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Building a generator or request failed.
    #[error("generation setup failed: {0}")]
    Generation(#[from] GenerationError),
}
