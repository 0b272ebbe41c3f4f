//! Comparison-specific error types.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | InvalidSize | Matrix requested with zero elements |
//! | InvalidIndex | Row/column outside `[0, n)` |
//! | InvalidJudgment | Self-comparison or non-positive / non-finite ratio |
//! | JudgmentConflict | Strict write of a differing value to an answered pair |
//! | IncompleteMatrix | Priorities requested before every pair was judged |
//! | SizeMismatch | Vector and matrix disagree on the element count |
//! | InvalidWeights | Priority vector that is empty, negative or not normalized |
//! | EmptyEvaluatorSet | Aggregation called without evaluator results |
//! | MismatchedDimension | Evaluator vectors of differing lengths |
//! | InvalidEvaluatorWeight | Evaluator weight that is not strictly positive |
//! | DegenerateAggregation | Every aggregated weight collapsed to zero |
//! | ElicitationComplete | Answer submitted after the last pair was judged |

use thiserror::Error;

use super::PairIndex;
use crate::domain::foundation::{DomainError, ErrorCode, EvaluatorId};

/// Errors raised by the comparison and priority engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComparisonError {
    #[error("Matrix size must be at least 1, got {0}")]
    InvalidSize(usize),

    #[error("Index ({row}, {col}) outside matrix of size {size}")]
    InvalidIndex { row: usize, col: usize, size: usize },

    #[error("Invalid judgment: {reason}")]
    InvalidJudgment { reason: String },

    #[error("Pair {pair} already judged as {existing}, refusing {submitted}")]
    JudgmentConflict {
        pair: PairIndex,
        existing: f64,
        submitted: f64,
    },

    #[error("Matrix incomplete: {answered} of {required} pairs judged")]
    IncompleteMatrix { answered: usize, required: usize },

    #[error("Expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid priority weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("No evaluator results supplied")]
    EmptyEvaluatorSet,

    #[error("Evaluator {evaluator_id} supplied {actual} weights, expected {expected}")]
    MismatchedDimension {
        evaluator_id: EvaluatorId,
        expected: usize,
        actual: usize,
    },

    #[error("Evaluator {evaluator_id} has invalid weight {weight}")]
    InvalidEvaluatorWeight { evaluator_id: EvaluatorId, weight: f64 },

    #[error("Aggregated weights collapsed to zero")]
    DegenerateAggregation,

    #[error("All pairs are already judged")]
    ElicitationComplete,
}

impl ComparisonError {
    pub fn invalid_judgment(reason: impl Into<String>) -> Self {
        ComparisonError::InvalidJudgment {
            reason: reason.into(),
        }
    }

    pub fn invalid_weights(reason: impl Into<String>) -> Self {
        ComparisonError::InvalidWeights {
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ComparisonError::InvalidSize(_) => ErrorCode::ValidationFailed,
            ComparisonError::InvalidIndex { .. } => ErrorCode::InvalidIndex,
            ComparisonError::InvalidJudgment { .. } => ErrorCode::InvalidJudgment,
            ComparisonError::JudgmentConflict { .. } => ErrorCode::JudgmentConflict,
            ComparisonError::IncompleteMatrix { .. } => ErrorCode::IncompleteMatrix,
            ComparisonError::SizeMismatch { .. } => ErrorCode::MismatchedDimension,
            ComparisonError::InvalidWeights { .. } => ErrorCode::InvalidWeights,
            ComparisonError::EmptyEvaluatorSet => ErrorCode::EmptyEvaluatorSet,
            ComparisonError::MismatchedDimension { .. } => ErrorCode::MismatchedDimension,
            ComparisonError::InvalidEvaluatorWeight { .. } => ErrorCode::InvalidWeights,
            ComparisonError::DegenerateAggregation => ErrorCode::InvalidWeights,
            ComparisonError::ElicitationComplete => ErrorCode::InvalidStateTransition,
        }
    }
}

impl From<ComparisonError> for DomainError {
    fn from(err: ComparisonError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
