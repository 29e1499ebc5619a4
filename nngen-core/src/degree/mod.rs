//! Configuration-model generation from a per-node degree sequence.
//!
//! Source nodes are split into contiguous, fixed slices, one per worker.
//! Every node's targets are drawn on a single worker and written straight
//! into that node's segment of the output buffer, located by an exclusive
//! prefix sum over the degrees.

mod complement;


pub use complement::DegreeComplementSampler;

use std::{collections::HashSet, ops::Range};

use tracing::{debug, warn};

use crate::{
    edges::{DegreeSide, ExistingEdges, check_buffer},
    error::{GenerationError, Result},
    nodes::IdRange,
    partition::contiguous_ranges,
    report::{GenerationMode, GenerationReport, Tally},
    workers::WorkerPool,
};

/// Owned per-node degree requirements.
///
/// # Examples
/// ```
/// use nngen_core::DegreeSequence;
///
/// let degrees = DegreeSequence::fixed(4, 3);
/// assert_eq!(degrees.as_slice(), &[3, 3, 3, 3]);
/// assert_eq!(degrees.total()?, 12);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DegreeSequence {
    degrees: Vec<usize>,
}

impl DegreeSequence {
    /// Builds a sequence assigning `degree` to each of `nodes` nodes.
    #[must_use]
    pub fn fixed(nodes: usize, degree: usize) -> Self {
        Self {
            degrees: vec![degree; nodes],
        }
    }

    /// Returns the degrees in node order.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_slice(&self) -> &[usize] { &self.degrees }

    /// Returns the sum of all degrees.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] when the sum overflows.
    pub fn total(&self) -> Result<usize> {
        degree_total(&self.degrees)
    }
}

impl From<Vec<usize>> for DegreeSequence {
    fn from(degrees: Vec<usize>) -> Self {
        Self { degrees }
    }
}

fn degree_total(degrees: &[usize]) -> Result<usize> {
    degrees
        .iter()
        .try_fold(0_usize, |acc, &degree| acc.checked_add(degree))
        .ok_or_else(|| GenerationError::invalid("degree sum overflows usize"))
}

/// Parameters of one configuration-model generation call.
///
/// # Examples
/// ```
/// use nngen_core::{DegreeSequenceRequest, DegreeSide};
///
/// let nodes: Vec<usize> = (0..10).collect();
/// let degrees = vec![2; 10];
/// let request = DegreeSequenceRequest::new(&nodes, &nodes, &degrees)?
///     .with_side(DegreeSide::In);
/// assert_eq!(request.total_edges()?, 20);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DegreeSequenceRequest<'a> {
    sources: &'a [usize],
    targets: &'a [usize],
    degrees: &'a [usize],
    side: DegreeSide,
    existing: ExistingEdges<'a>,
}

impl<'a> DegreeSequenceRequest<'a> {
    /// Pairs each id in `sources` with the degree at the same position.
    ///
    /// # Errors
    /// Returns [`GenerationError::LengthMismatch`] when `sources` and
    /// `degrees` differ in length.
    pub fn new(sources: &'a [usize], targets: &'a [usize], degrees: &'a [usize]) -> Result<Self> {
        if sources.len() != degrees.len() {
            return Err(GenerationError::LengthMismatch {
                what: "degrees",
                left: sources.len(),
                right: degrees.len(),
            });
        }
        Ok(Self {
            sources,
            targets,
            degrees,
            side: DegreeSide::Out,
            existing: ExistingEdges::empty(),
        })
    }

    /// Selects which column holds the node whose degree is fixed.
    #[must_use]
    pub const fn with_side(mut self, side: DegreeSide) -> Self {
        self.side = side;
        self
    }

    /// Sets the edges already present in the output prefix.
    #[must_use]
    pub const fn with_existing(mut self, existing: ExistingEdges<'a>) -> Self {
        self.existing = existing;
        self
    }

    #[must_use]
    #[rustfmt::skip]
    pub const fn sources(&self) -> &'a [usize] { self.sources }

    #[must_use]
    #[rustfmt::skip]
    pub const fn targets(&self) -> &'a [usize] { self.targets }

    #[must_use]
    #[rustfmt::skip]
    pub const fn degrees(&self) -> &'a [usize] { self.degrees }

    #[must_use]
    #[rustfmt::skip]
    pub const fn side(&self) -> DegreeSide { self.side }

    #[must_use]
    #[rustfmt::skip]
    pub const fn existing(&self) -> ExistingEdges<'a> { self.existing }

    /// Number of new edges the request produces.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] when the degree sum
    /// overflows.
    pub fn total_edges(&self) -> Result<usize> {
        degree_total(self.degrees)
    }

    /// Length the output buffer must have.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameters`] on overflow.
    pub fn buffer_len(&self) -> Result<usize> {
        crate::edges::expected_buffer_len(self.existing.len(), self.total_edges()?)
    }
}

/// Checks a request and returns the target range, without sampling.
fn validate(
    request: &DegreeSequenceRequest<'_>,
    multigraph: bool,
    out: &[usize],
) -> Result<(usize, IdRange)> {
    let total = request.total_edges()?;
    check_buffer(out, request.existing.len(), total)?;
    let targets = IdRange::spanning(request.targets, "target")?;
    let sampler = DegreeComplementSampler::new(targets, multigraph);

    if !multigraph {
        let mut seen = HashSet::with_capacity(request.sources.len());
        if let Some(&node) = request.sources.iter().find(|&&node| !seen.insert(node)) {
            return Err(GenerationError::invalid(format!(
                "source node {node} appears more than once"
            )));
        }
    }

    for (&node, &degree) in request.sources.iter().zip(request.degrees) {
        let pool = sampler.pool(node);
        let available = if multigraph {
            if pool == 0 { 0 } else { degree }
        } else {
            pool
        };
        if degree > available {
            warn!(node, degree, available, "degree exceeds reachable targets");
            return Err(GenerationError::Capacity {
                requested: degree,
                available,
            });
        }
    }

    if !request.existing.is_empty() {
        let recorded = request.existing.recorded_by(request.side);
        for (&node, &degree) in request.sources.iter().zip(request.degrees) {
            if degree == 0 {
                continue;
            }
            if let Some(others) = recorded.get(&node) {
                return Err(GenerationError::PreconditionViolation {
                    node,
                    recorded: others.len(),
                });
            }
        }
    }
    Ok((total, targets))
}

/// Exclusive prefix sum of `degrees` with the total appended.
fn offsets(degrees: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(degrees.len() + 1);
    let mut running = 0;
    offsets.push(running);
    for &degree in degrees {
        running += degree;
        offsets.push(running);
    }
    offsets
}

struct WorkerSlice<'buf> {
    nodes: Range<usize>,
    out: &'buf mut [usize],
}

/// Splits the new-edge region into one disjoint slice per worker.
fn split_output<'buf>(
    mut region: &'buf mut [usize],
    offsets: &[usize],
    partitions: Vec<Range<usize>>,
) -> Vec<WorkerSlice<'buf>> {
    let mut slices = Vec::with_capacity(partitions.len());
    for nodes in partitions {
        let edges = offsets[nodes.end] - offsets[nodes.start];
        let (head, tail) = region.split_at_mut(edges * 2);
        region = tail;
        slices.push(WorkerSlice { nodes, out: head });
    }
    slices
}

pub(crate) fn generate(
    pool: &mut WorkerPool,
    request: &DegreeSequenceRequest<'_>,
    multigraph: bool,
    out: &mut [usize],
) -> Result<GenerationReport> {
    let (total, targets) = validate(request, multigraph, out)?;
    let existing = request.existing;
    existing.write_prefix(out);

    let mut report = GenerationReport::new(GenerationMode::DegreeSequence);
    if total == 0 {
        return Ok(report);
    }

    let offsets = offsets(request.degrees);
    let partitions = contiguous_ranges(request.sources.len(), pool.worker_count());
    let region = &mut out[existing.len() * 2..];
    let slices = split_output(region, &offsets, partitions);

    let sampler = DegreeComplementSampler::new(targets, multigraph);
    let side = request.side;
    let sources = request.sources;
    let degrees = request.degrees;
    let tallies = pool.scatter(slices, |slice, stream| {
        let base = offsets[slice.nodes.start];
        let mut picks = Vec::new();
        let mut tally = Tally::default();
        for index in slice.nodes.clone() {
            let node = sources[index];
            let degree = degrees[index];
            if degree == 0 {
                continue;
            }
            tally.merge(sampler.sample(node, degree, &[], stream, &mut picks)?);
            let start = (offsets[index] - base) * 2;
            let segment = &mut slice.out[start..start + degree * 2];
            for (pair, &other) in segment.chunks_exact_mut(2).zip(&picks) {
                let edge = side.orient(node, other);
                pair[0] = edge.source();
                pair[1] = edge.target();
            }
        }
        debug!(
            worker = stream.index(),
            nodes = slice.nodes.len(),
            rounds = tally.rounds,
            "worker finished degree slice"
        );
        Ok(tally)
    })?;

    for tally in tallies {
        report.absorb(tally);
    }
    Ok(report)
}
