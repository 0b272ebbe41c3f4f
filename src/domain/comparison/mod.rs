//! Comparison module - Reciprocal judgment matrices and their elicitation.
//!
//! # Invariants
//!
//! - Diagonal cells are exactly 1
//! - Every cell is positive and finite
//! - `value(j, i) == 1 / value(i, j)` after every write
//! - "Answered" is tracked explicitly, never inferred from a cell being 1

mod errors;
mod matrix;
mod pair;
mod record;
mod scale;
mod sequencer;

pub use errors::ComparisonError;
pub use matrix::{ComparisonMatrix, JudgmentOutcome, MatrixSnapshot, JUDGMENT_TOLERANCE};
pub use pair::{required_pairs, AnsweredSet, PairIndex};
pub use record::JudgmentRecord;
pub use scale::{Intensity, Preference, SaatyScale, ScaleEntry, ScaleLevel, SCALE_MATCH_TOLERANCE};
pub use sequencer::{ComparisonSequencer, ElicitationPhase, ElicitationSession, NextComparison};
