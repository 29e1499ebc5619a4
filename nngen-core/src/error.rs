//! Error types for the nngen core library.
//!
//! Defines the error enum exposed by the public API, its stable codes, and a
//! convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by the edge generators.
///
/// Every variant except [`GenerationError::GenerationTimeout`] is raised
/// before any worker starts sampling.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GenerationError {
    /// The request asks for more distinct edges than the node sets can hold.
    #[error("requested {requested} edges but only {available} distinct pairs are reachable")]
    Capacity {
        /// Number of edges (or degree) requested by the caller.
        requested: usize,
        /// Number of distinct pairs still reachable.
        available: usize,
    },
    /// The distance-decay rule name was not recognised.
    #[error("unknown distance rule `{rule}`; expected `lin` or `exp`")]
    InvalidRule {
        /// The rule name supplied by the caller.
        rule: Arc<str>,
    },
    /// Complement sampling was requested for a node that already owns edges.
    #[error("node {node} already has {recorded} recorded edges; complement sampling needs none")]
    PreconditionViolation {
        /// The node whose recorded edges violate the precondition.
        node: usize,
        /// Number of edges already recorded for the node.
        recorded: usize,
    },
    /// A rejection loop exhausted its retry budget.
    #[error("{stage} gave up after {attempts} attempts without reaching the target")]
    GenerationTimeout {
        /// Sampling stage that exhausted its budget.
        stage: &'static str,
        /// Number of rounds or draws spent before giving up.
        attempts: u64,
    },
    /// Parameters were invalid for the requested generation.
    #[error("invalid generation parameter: {reason}")]
    InvalidParameters {
        /// Human-readable description of the invalid parameter.
        reason: String,
    },
    /// Output buffer length did not match the number of edges produced.
    #[error("output buffer has length {out} but {expected} entries are required")]
    BufferLengthMismatch {
        /// Caller-provided buffer length.
        out: usize,
        /// Length required to hold existing and new edges.
        expected: usize,
    },
    /// Two arrays that must run in parallel had different lengths.
    #[error("{what} length mismatch: left={left}, right={right}")]
    LengthMismatch {
        /// Name of the mismatched array pair.
        what: &'static str,
        /// Length of the left-hand array.
        left: usize,
        /// Length of the right-hand array.
        right: usize,
    },
    /// A node set that must contain ids was empty.
    #[error("the {role} node set is empty")]
    EmptyPopulation {
        /// Which node set was empty (`"source"` or `"target"`).
        role: &'static str,
    },
    /// A node id fell outside the supplied positions.
    #[error("node {node} has no position; only {node_count} positions were supplied")]
    InvalidNodeId {
        /// The offending node id.
        node: usize,
        /// Number of positions available.
        node_count: usize,
    },
    /// The worker thread pool could not be created.
    #[error("failed to build the worker pool: {message}")]
    ThreadPool {
        /// Message reported by rayon.
        message: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerationError`] variants.
    enum GenerationErrorCode for GenerationError {
        /// The request asks for more distinct edges than the node sets can hold.
        Capacity => Capacity { .. } => "GENERATION_CAPACITY_EXCEEDED",
        /// The distance-decay rule name was not recognised.
        InvalidRule => InvalidRule { .. } => "GENERATION_INVALID_RULE",
        /// Complement sampling was requested for a node that already owns edges.
        PreconditionViolation => PreconditionViolation { .. } => "GENERATION_PRECONDITION_VIOLATION",
        /// A rejection loop exhausted its retry budget.
        GenerationTimeout => GenerationTimeout { .. } => "GENERATION_TIMEOUT",
        /// Parameters were invalid for the requested generation.
        InvalidParameters => InvalidParameters { .. } => "GENERATION_INVALID_PARAMETERS",
        /// Output buffer length did not match the number of edges produced.
        BufferLengthMismatch => BufferLengthMismatch { .. } => "GENERATION_BUFFER_LENGTH_MISMATCH",
        /// Two arrays that must run in parallel had different lengths.
        LengthMismatch => LengthMismatch { .. } => "GENERATION_LENGTH_MISMATCH",
        /// A node set that must contain ids was empty.
        EmptyPopulation => EmptyPopulation { .. } => "GENERATION_EMPTY_POPULATION",
        /// A node id fell outside the supplied positions.
        InvalidNodeId => InvalidNodeId { .. } => "GENERATION_INVALID_NODE_ID",
        /// The worker thread pool could not be created.
        ThreadPool => ThreadPool { .. } => "GENERATION_THREAD_POOL",
    }
}

impl GenerationError {
    /// Returns `true` when the error was raised by an analytic capacity check.
    #[must_use]
    pub const fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. })
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GenerationError>;
