//! Benchmark support crate for nngen.
//!
//! Provides seeded point layouts and parameter types used by the Criterion
//! benchmarks for degree-sequence and distance-rule generation.

pub mod error;
pub mod params;
pub mod source;
