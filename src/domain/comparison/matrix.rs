//! Reciprocal pairwise comparison matrix for one parent node's children.
//!
//! Only the upper triangle is stored; `value(j, i)` is always derived as
//! `1 / value(i, j)`, so a judgment is a single write and reciprocity cannot
//! drift. Unjudged pairs read as 1 but are tracked as unanswered.

use serde::Serialize;

use super::{
    AnsweredSet, ComparisonError, JudgmentRecord, PairIndex, SaatyScale, ScaleLevel,
};
use crate::domain::foundation::MatrixKey;

/// Relative tolerance for treating two judgment values as identical.
pub const JUDGMENT_TOLERANCE: f64 = 1e-9;

/// Result of writing a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JudgmentOutcome {
    /// First judgment for this pair.
    Recorded,
    /// Same value resubmitted (e.g. a retried request); nothing changed.
    Unchanged,
    /// A differing value replaced the earlier judgment (last write wins).
    /// `previous` is oriented the way the caller wrote the new value.
    Replaced { previous: f64 },
}

impl JudgmentOutcome {
    /// True when an earlier, different judgment was overwritten.
    pub fn is_conflict(&self) -> bool {
        matches!(self, JudgmentOutcome::Replaced { .. })
    }
}

/// n×n reciprocal comparison matrix with an explicit answered set.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonMatrix {
    size: usize,
    upper: Vec<f64>,
    answered: AnsweredSet,
}

impl ComparisonMatrix {
    /// Creates an n×n matrix with every cell at 1 and no pair answered.
    pub fn create(size: usize) -> Result<Self, ComparisonError> {
        if size == 0 {
            return Err(ComparisonError::InvalidSize(size));
        }
        Ok(Self {
            size,
            upper: vec![1.0; super::required_pairs(size)],
            answered: AnsweredSet::new(size),
        })
    }

    /// Rebuilds a matrix from persisted records, validating every one.
    ///
    /// Records may be in either orientation. A later record for the same pair
    /// replaces an earlier one.
    pub fn from_records(size: usize, records: &[JudgmentRecord]) -> Result<Self, ComparisonError> {
        let mut matrix = Self::create(size)?;
        for record in records {
            matrix.set_judgment(record.row, record.col, record.value)?;
        }
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `value(row, col)`. Unanswered pairs read as 1.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, ComparisonError> {
        self.check_index(row, col)?;
        Ok(self.value_at(row, col))
    }

    /// Returns the judged value, or `None` if the pair was never answered.
    pub fn judgment(&self, row: usize, col: usize) -> Result<Option<f64>, ComparisonError> {
        let pair = self.pair_for(row, col)?;
        Ok(self
            .answered
            .contains(&pair)
            .then(|| self.value_at(row, col)))
    }

    /// Sets `value(row, col) = value` and `value(col, row) = 1 / value` as one write.
    ///
    /// Resubmitting the same value is a no-op; a different value for an
    /// answered pair overwrites it and is reported as `Replaced`.
    pub fn set_judgment(
        &mut self,
        row: usize,
        col: usize,
        value: f64,
    ) -> Result<JudgmentOutcome, ComparisonError> {
        let pair = self.pair_for(row, col)?;
        Self::validate_value(value)?;

        let stored = oriented(row, col, value);
        let offset = pair.triangle_offset(self.size);

        let outcome = if self.answered.contains(&pair) {
            let existing = self.upper[offset];
            if same_judgment(existing, stored) {
                return Ok(JudgmentOutcome::Unchanged);
            }
            JudgmentOutcome::Replaced {
                previous: oriented(row, col, existing),
            }
        } else {
            JudgmentOutcome::Recorded
        };

        self.upper[offset] = stored;
        self.answered.insert(pair);
        Ok(outcome)
    }

    /// Like `set_judgment`, but refuses to overwrite a differing answer.
    pub fn try_set_judgment(
        &mut self,
        row: usize,
        col: usize,
        value: f64,
    ) -> Result<JudgmentOutcome, ComparisonError> {
        let pair = self.pair_for(row, col)?;
        Self::validate_value(value)?;

        if let Some(existing) = self.judgment(row, col)? {
            if !same_judgment(existing, value) {
                return Err(ComparisonError::JudgmentConflict {
                    pair,
                    existing,
                    submitted: value,
                });
            }
        }
        self.set_judgment(row, col, value)
    }

    /// Records a qualitative scale level for `(row, col)`.
    pub fn set_level(
        &mut self,
        row: usize,
        col: usize,
        level: ScaleLevel,
    ) -> Result<JudgmentOutcome, ComparisonError> {
        self.set_judgment(row, col, SaatyScale::encode(level))
    }

    /// Clears a judgment back to unanswered. Returns false if it was not answered.
    pub fn reset_judgment(&mut self, row: usize, col: usize) -> Result<bool, ComparisonError> {
        let pair = self.pair_for(row, col)?;
        let offset = pair.triangle_offset(self.size);
        self.upper[offset] = 1.0;
        Ok(self.answered.remove(&pair))
    }

    pub fn answered(&self) -> &AnsweredSet {
        &self.answered
    }

    pub fn is_complete(&self) -> bool {
        self.answered.is_complete()
    }

    /// Immutable full copy for computation.
    pub fn snapshot(&self) -> MatrixSnapshot {
        let n = self.size;
        let mut values = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                values.push(self.value_at(i, j));
            }
        }
        MatrixSnapshot {
            size: n,
            values,
            answered: self.answered.clone(),
        }
    }

    /// Answered judgments as canonical (`row < col`) records.
    pub fn to_records(&self, matrix: MatrixKey) -> Vec<JudgmentRecord> {
        self.answered
            .iter()
            .map(|pair| {
                JudgmentRecord::new(
                    matrix,
                    pair.row(),
                    pair.col(),
                    self.upper[pair.triangle_offset(self.size)],
                )
            })
            .collect()
    }

    fn value_at(&self, row: usize, col: usize) -> f64 {
        match PairIndex::new(row, col) {
            None => 1.0,
            Some(pair) => oriented(row, col, self.upper[pair.triangle_offset(self.size)]),
        }
    }

    fn check_index(&self, row: usize, col: usize) -> Result<(), ComparisonError> {
        if row >= self.size || col >= self.size {
            return Err(ComparisonError::InvalidIndex {
                row,
                col,
                size: self.size,
            });
        }
        Ok(())
    }

    fn pair_for(&self, row: usize, col: usize) -> Result<PairIndex, ComparisonError> {
        self.check_index(row, col)?;
        PairIndex::new(row, col).ok_or_else(|| {
            ComparisonError::invalid_judgment(format!("cannot compare element {} with itself", row))
        })
    }

    /// Both the ratio and its reciprocal must be normal positive floats, so
    /// the mirrored cell stays finite and non-zero.
    fn validate_value(value: f64) -> Result<(), ComparisonError> {
        if value <= 0.0 || !value.is_normal() || !(1.0 / value).is_normal() {
            return Err(ComparisonError::invalid_judgment(format!(
                "ratio must be positive with a finite reciprocal, got {}",
                value
            )));
        }
        Ok(())
    }
}

/// Upper-triangle orientation of a value written at `(row, col)`.
/// Self-inverse, so it also maps a stored value back to `(row, col)`.
fn oriented(row: usize, col: usize, value: f64) -> f64 {
    if row < col {
        value
    } else {
        1.0 / value
    }
}

fn same_judgment(a: f64, b: f64) -> bool {
    (a / b - 1.0).abs() <= JUDGMENT_TOLERANCE
}

/// Immutable copy of a comparison matrix, safe to compute on.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSnapshot {
    size: usize,
    values: Vec<f64>,
    answered: AnsweredSet,
}

impl MatrixSnapshot {
    /// Builds a complete snapshot from full rows, checking every invariant.
    ///
    /// Used at boundaries where a matrix arrives as raw numbers.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ComparisonError> {
        let n = rows.len();
        let mut matrix = ComparisonMatrix::create(n)?;

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(ComparisonError::SizeMismatch {
                    expected: n,
                    actual: row.len(),
                });
            }
            if (row[i] - 1.0).abs() > JUDGMENT_TOLERANCE {
                return Err(ComparisonError::invalid_judgment(format!(
                    "diagonal cell ({}, {}) must be 1, got {}",
                    i, i, row[i]
                )));
            }
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let (upper, lower) = (rows[i][j], rows[j][i]);
                ComparisonMatrix::validate_value(lower)?;
                if !same_judgment(upper, 1.0 / lower) {
                    return Err(ComparisonError::invalid_judgment(format!(
                        "cells ({}, {}) = {} and ({}, {}) = {} are not reciprocal",
                        i, j, upper, j, i, lower
                    )));
                }
                matrix.set_judgment(i, j, upper)?;
            }
        }

        Ok(matrix.snapshot())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `value(row, col)`, or `None` out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.size && col < self.size).then(|| self.values[row * self.size + col])
    }

    /// Row slice; `row` must be in range.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.size..(row + 1) * self.size]
    }

    pub fn answered(&self) -> &AnsweredSet {
        &self.answered
    }

    pub fn is_complete(&self) -> bool {
        self.answered.is_complete()
    }

    /// Fails with `IncompleteMatrix` unless every pair has been judged.
    pub fn ensure_complete(&self) -> Result<(), ComparisonError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ComparisonError::IncompleteMatrix {
                answered: self.answered.len(),
                required: self.answered.required(),
            })
        }
    }

    /// Matrix-vector product `A · w`.
    pub fn multiply(&self, weights: &[f64]) -> Vec<f64> {
        (0..self.size)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(weights)
                    .map(|(a, w)| a * w)
                    .sum()
            })
            .collect()
    }
}
