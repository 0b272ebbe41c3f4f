//! Wire-level judgment record exchanged with the persistence collaborator.

use serde::{Deserialize, Serialize};

use super::PairIndex;
use crate::domain::foundation::MatrixKey;

/// One persisted judgment: `value(row, col)` for the matrix identified by `matrix`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JudgmentRecord {
    #[serde(flatten)]
    pub matrix: MatrixKey,
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl JudgmentRecord {
    pub fn new(matrix: MatrixKey, row: usize, col: usize, value: f64) -> Self {
        Self {
            matrix,
            row,
            col,
            value,
        }
    }

    /// The same judgment oriented so that `row < col`.
    ///
    /// Records for the diagonal are returned unchanged; the matrix rejects them.
    pub fn canonical(&self) -> Self {
        if self.row > self.col {
            Self {
                matrix: self.matrix,
                row: self.col,
                col: self.row,
                value: 1.0 / self.value,
            }
        } else {
            *self
        }
    }

    pub fn pair(&self) -> Option<PairIndex> {
        PairIndex::new(self.row, self.col)
    }
}
