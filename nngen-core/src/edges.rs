//! Edge values, the flat output buffer, and the existing-edge prefix.
//!
//! Edges travel through the generators as [`Edge`] pairs and are written to
//! caller storage as interleaved `(source, target)` integers.

use std::collections::HashMap;

use crate::error::{GenerationError, Result};

/// Ordered `(source, target)` pair produced by the generators.
///
/// # Examples
/// ```
/// use nngen_core::Edge;
///
/// let edge = Edge::new(3, 7);
/// assert_eq!(edge.source(), 3);
/// assert_eq!(edge.target(), 7);
/// assert!(!edge.is_self_loop());
/// assert_eq!(edge.reversed(), Edge::new(7, 3));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    source: usize,
    target: usize,
}

impl Edge {
    /// Creates a new edge.
    #[must_use]
    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    /// Returns the source node identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> usize { self.source }

    /// Returns the target node identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> usize { self.target }

    /// Returns `true` when both endpoints are the same node.
    #[must_use]
    pub const fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns the edge with its endpoints swapped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

/// Immutable prefix of edges accepted before the current generation call.
///
/// Existing edges are copied verbatim to the front of the output buffer and
/// count toward uniqueness for every non-multigraph request.
///
/// # Examples
/// ```
/// use nngen_core::{Edge, ExistingEdges};
///
/// let sources = [0, 1];
/// let targets = [1, 2];
/// let existing = ExistingEdges::new(&sources, &targets)?;
/// assert_eq!(existing.len(), 2);
/// assert_eq!(existing.iter().collect::<Vec<_>>(), [Edge::new(0, 1), Edge::new(1, 2)]);
/// # Ok::<(), nngen_core::GenerationError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ExistingEdges<'a> {
    sources: &'a [usize],
    targets: &'a [usize],
}

impl<'a> ExistingEdges<'a> {
    /// Wraps two parallel id arrays.
    ///
    /// # Errors
    /// Returns [`GenerationError::LengthMismatch`] when the arrays differ in
    /// length.
    pub fn new(sources: &'a [usize], targets: &'a [usize]) -> Result<Self> {
        if sources.len() != targets.len() {
            return Err(GenerationError::LengthMismatch {
                what: "existing edges",
                left: sources.len(),
                right: targets.len(),
            });
        }
        Ok(Self { sources, targets })
    }

    /// Returns an empty prefix.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            sources: &[],
            targets: &[],
        }
    }

    /// Returns the number of existing edges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn len(&self) -> usize { self.sources.len() }

    /// Returns `true` when there are no existing edges.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.sources.is_empty() }

    /// Iterates the existing edges in their stored order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
        self.sources
            .iter()
            .zip(self.targets)
            .map(|(&source, &target)| Edge::new(source, target))
    }

    /// Groups the existing edges by the node occupying `side`'s column and
    /// returns the opposite endpoints.
    pub(crate) fn recorded_by(&self, side: DegreeSide) -> HashMap<usize, Vec<usize>> {
        let mut recorded: HashMap<usize, Vec<usize>> = HashMap::new();
        for edge in self.iter() {
            let (owner, other) = side.split(edge);
            recorded.entry(owner).or_default().push(other);
        }
        recorded
    }

    pub(crate) fn write_prefix(&self, out: &mut [usize]) {
        for (slot, edge) in out.chunks_exact_mut(2).zip(self.iter()) {
            slot[0] = edge.source();
            slot[1] = edge.target();
        }
    }
}

/// Selects which column of each pair holds the node whose degree is being
/// satisfied.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DegreeSide {
    /// The node is the source; its out-degree is fixed.
    #[default]
    Out,
    /// The node is the target; its in-degree is fixed.
    In,
}

impl DegreeSide {
    /// Builds the edge joining `node` to `other` with `node` in this side's
    /// column.
    #[must_use]
    pub const fn orient(self, node: usize, other: usize) -> Edge {
        match self {
            Self::Out => Edge::new(node, other),
            Self::In => Edge::new(other, node),
        }
    }

    /// Splits an edge into `(node on this side, opposite endpoint)`.
    #[must_use]
    pub const fn split(self, edge: Edge) -> (usize, usize) {
        match self {
            Self::Out => (edge.source(), edge.target()),
            Self::In => (edge.target(), edge.source()),
        }
    }
}

/// Owned, zero-initialised flat edge buffer.
///
/// # Examples
/// ```
/// use nngen_core::{Edge, EdgeBuffer};
///
/// let mut buffer = EdgeBuffer::zeroed(2);
/// assert_eq!(buffer.as_slice().len(), 4);
/// buffer.as_mut_slice().copy_from_slice(&[0, 1, 1, 2]);
/// assert_eq!(buffer.edges().collect::<Vec<_>>(), [Edge::new(0, 1), Edge::new(1, 2)]);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EdgeBuffer {
    data: Vec<usize>,
}

impl EdgeBuffer {
    /// Allocates storage for `edge_count` interleaved pairs.
    #[must_use]
    pub fn zeroed(edge_count: usize) -> Self {
        Self {
            data: vec![0; edge_count.saturating_mul(2)],
        }
    }

    /// Returns the number of edges the buffer holds.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.data.len() / 2 }

    /// Returns the flat interleaved storage.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_slice(&self) -> &[usize] { &self.data }

    /// Returns the flat interleaved storage for writing.
    #[rustfmt::skip]
    pub fn as_mut_slice(&mut self) -> &mut [usize] { &mut self.data }

    /// Iterates the stored pairs as edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        edges_of(&self.data)
    }

    /// Consumes the buffer and returns the flat storage.
    #[must_use]
    pub fn into_inner(self) -> Vec<usize> {
        self.data
    }
}

/// Iterates a flat interleaved buffer as edges; a trailing odd entry is
/// ignored.
pub fn edges_of(flat: &[usize]) -> impl Iterator<Item = Edge> + '_ {
    flat.chunks_exact(2)
        .map(|pair| Edge::new(pair[0], pair[1]))
}

pub(crate) fn expected_buffer_len(existing: usize, requested: usize) -> Result<usize> {
    existing
        .checked_add(requested)
        .and_then(|total| total.checked_mul(2))
        .ok_or_else(|| GenerationError::invalid("edge count overflows the address space"))
}

pub(crate) fn check_buffer(out: &[usize], existing: usize, requested: usize) -> Result<()> {
    let expected = expected_buffer_len(existing, requested)?;
    if out.len() != expected {
        return Err(GenerationError::BufferLengthMismatch {
            out: out.len(),
            expected,
        });
    }
    Ok(())
}
