//! Property-based tests for both generators.
//!
//! Randomised node sets, degree sequences and point layouts are pushed
//! through the public generator surface, and the results are checked for
//! exact counts, simple-graph structure and reproducibility.

mod strategies;
mod types;
