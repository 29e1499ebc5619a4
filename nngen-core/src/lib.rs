//! Parallel stochastic edge generation for network models.
//!
//! Two generators are exposed through [`EdgeGenerator`]: a degree-sequence
//! (configuration) model that gives every node an exact degree, and a
//! spatial model that draws an exact number of edges under a distance-decay
//! [`ConnectionRule`]. Both write interleaved `(source, target)` pairs into a
//! caller-supplied buffer and are reproducible for a fixed master seed and
//! worker count.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod count;
mod dedup;
mod degree;
mod edges;
mod error;
mod generator;
mod nodes;
mod partition;
mod report;
mod rule;
mod seed;
mod spatial;
mod workers;

#[cfg(test)]
mod property;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DEFAULT_MASTER_SEED, GeneratorBuilder},
    count::EdgeCount,
    dedup::DeduplicationIndex,
    degree::{DegreeComplementSampler, DegreeSequence, DegreeSequenceRequest},
    edges::{DegreeSide, Edge, EdgeBuffer, ExistingEdges, edges_of},
    error::{GenerationError, GenerationErrorCode, Result},
    generator::EdgeGenerator,
    nodes::{IdRange, Positions},
    report::{GenerationMode, GenerationReport, Tally},
    rule::{ConnectionRule, DecayRule, connection_probability},
    seed::{SeedManager, WorkerStream},
    spatial::{CandidateLists, DistanceRuleRequest, StrategySelection, TrialEstimate},
};
