use std::sync::Arc;

use nngen_core::{GenerationError, GenerationErrorCode};
use rstest::rstest;

#[rstest]
#[case(
    GenerationError::Capacity { requested: 10, available: 6 },
    GenerationErrorCode::Capacity,
    "GENERATION_CAPACITY_EXCEEDED",
)]
#[case(
    GenerationError::InvalidRule { rule: Arc::from("gauss") },
    GenerationErrorCode::InvalidRule,
    "GENERATION_INVALID_RULE",
)]
#[case(
    GenerationError::PreconditionViolation { node: 3, recorded: 2 },
    GenerationErrorCode::PreconditionViolation,
    "GENERATION_PRECONDITION_VIOLATION",
)]
#[case(
    GenerationError::GenerationTimeout { stage: "degree_complement", attempts: 64 },
    GenerationErrorCode::GenerationTimeout,
    "GENERATION_TIMEOUT",
)]
#[case(
    GenerationError::InvalidParameters { reason: "scale must be positive".to_owned() },
    GenerationErrorCode::InvalidParameters,
    "GENERATION_INVALID_PARAMETERS",
)]
#[case(
    GenerationError::BufferLengthMismatch { out: 4, expected: 6 },
    GenerationErrorCode::BufferLengthMismatch,
    "GENERATION_BUFFER_LENGTH_MISMATCH",
)]
#[case(
    GenerationError::EmptyPopulation { role: "source" },
    GenerationErrorCode::EmptyPopulation,
    "GENERATION_EMPTY_POPULATION",
)]
#[case(
    GenerationError::InvalidNodeId { node: 9, node_count: 4 },
    GenerationErrorCode::InvalidNodeId,
    "GENERATION_INVALID_NODE_ID",
)]
fn returns_expected_generation_code(
    #[case] error: GenerationError,
    #[case] expected: GenerationErrorCode,
    #[case] code: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), code);
    assert_eq!(error.code().to_string(), code);
}

#[test]
fn only_capacity_errors_report_capacity() {
    assert!(GenerationError::Capacity { requested: 1, available: 0 }.is_capacity());
    assert!(!GenerationError::EmptyPopulation { role: "target" }.is_capacity());
}

#[test]
fn capacity_message_names_both_counts() {
    let message = GenerationError::Capacity {
        requested: 10,
        available: 6,
    }
    .to_string();
    assert!(message.contains("10"));
    assert!(message.contains('6'));
}
