//! Consistency Validator - CI, CR and the judgment most in need of revision.
//!
//! An inconsistent verdict is advisory. Whether it blocks acceptance is the
//! caller's policy.

use serde::{Deserialize, Serialize};

use super::PriorityVector;
use crate::domain::comparison::{ComparisonError, MatrixSnapshot};

/// Default acceptance threshold for the consistency ratio.
pub const CONSISTENCY_THRESHOLD: f64 = 0.1;

/// Saaty random index for n = 1..=15.
pub const RANDOM_INDEX: [f64; 15] = [
    0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

/// Ratio deviations at or below this count as a perfect match.
const WORST_PAIR_EPSILON: f64 = 1e-6;

/// Random index lookup for one matrix size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomIndex {
    pub value: f64,
    /// True when `n` lies beyond the table and the largest entry was used.
    pub approximate: bool,
}

impl RandomIndex {
    pub fn for_size(n: usize) -> Self {
        match n.checked_sub(1).and_then(|i| RANDOM_INDEX.get(i)) {
            Some(value) => Self {
                value: *value,
                approximate: false,
            },
            None if n == 0 => Self {
                value: 0.0,
                approximate: false,
            },
            None => Self {
                value: RANDOM_INDEX[RANDOM_INDEX.len() - 1],
                approximate: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyVerdict {
    Consistent,
    Inconsistent,
}

/// The judged pair that deviates most from the derived weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorstPair {
    pub row: usize,
    pub col: usize,
    /// Direct judgment `value(row, col)`.
    pub judged: f64,
    /// Ratio implied by the weights, `w_row / w_col`.
    pub implied: f64,
    /// `max(judged / implied, implied / judged)`, always ≥ 1.
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub random_index: RandomIndex,
    pub consistency_ratio: f64,
    pub threshold: f64,
    pub verdict: ConsistencyVerdict,
    pub worst_pair: Option<WorstPair>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.verdict == ConsistencyVerdict::Consistent
    }
}

/// Computes consistency diagnostics against a configurable threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsistencyValidator {
    threshold: f64,
}

impl Default for ConsistencyValidator {
    fn default() -> Self {
        Self {
            threshold: CONSISTENCY_THRESHOLD,
        }
    }
}

impl ConsistencyValidator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn evaluate(
        &self,
        snapshot: &MatrixSnapshot,
        vector: &PriorityVector,
        lambda_max: f64,
    ) -> Result<ConsistencyReport, ComparisonError> {
        let n = snapshot.size();
        if vector.len() != n {
            return Err(ComparisonError::SizeMismatch {
                expected: n,
                actual: vector.len(),
            });
        }

        let consistency_index = Self::consistency_index(n, lambda_max);
        let random_index = RandomIndex::for_size(n);
        let consistency_ratio = if random_index.value > 0.0 {
            consistency_index / random_index.value
        } else {
            0.0
        };
        let verdict = if consistency_ratio <= self.threshold {
            ConsistencyVerdict::Consistent
        } else {
            ConsistencyVerdict::Inconsistent
        };

        Ok(ConsistencyReport {
            lambda_max,
            consistency_index,
            random_index,
            consistency_ratio,
            threshold: self.threshold,
            verdict,
            worst_pair: Self::worst_pair(snapshot, vector),
        })
    }

    /// `(λmax − n) / (n − 1)`, zero for n ≤ 2 and never negative.
    pub fn consistency_index(n: usize, lambda_max: f64) -> f64 {
        if n <= 2 {
            return 0.0;
        }
        ((lambda_max - n as f64) / (n as f64 - 1.0)).max(0.0)
    }

    /// Largest deviation between a judgment and the ratio its weights imply.
    ///
    /// `None` when every judged pair already agrees with the weights.
    pub fn worst_pair(snapshot: &MatrixSnapshot, vector: &PriorityVector) -> Option<WorstPair> {
        let weights = vector.weights();
        snapshot
            .answered()
            .iter()
            .filter_map(|pair| {
                let (row, col) = (pair.row(), pair.col());
                let (wi, wj) = (*weights.get(row)?, *weights.get(col)?);
                if wi <= 0.0 || wj <= 0.0 {
                    return None;
                }
                let judged = snapshot.get(row, col)?;
                let implied = wi / wj;
                let ratio = judged / implied;
                Some(WorstPair {
                    row,
                    col,
                    judged,
                    implied,
                    deviation: ratio.max(1.0 / ratio),
                })
            })
            .fold(None, |worst: Option<WorstPair>, candidate| match worst {
                Some(w) if w.deviation >= candidate.deviation => Some(w),
                _ => Some(candidate),
            })
            .filter(|w| w.deviation > 1.0 + WORST_PAIR_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::priority::PriorityEngine;

    fn report_for(rows: &[Vec<f64>]) -> ConsistencyReport {
        let snapshot = MatrixSnapshot::from_rows(rows).unwrap();
        let derivation = PriorityEngine::default().derive(&snapshot).unwrap();
        ConsistencyValidator::default()
            .evaluate(&snapshot, &derivation.vector, derivation.lambda_max)
            .unwrap()
    }

    #[test]
    fn random_index_table_lookup() {
        assert_eq!(RandomIndex::for_size(1).value, 0.0);
        assert_eq!(RandomIndex::for_size(3).value, 0.58);
        assert_eq!(RandomIndex::for_size(10).value, 1.49);
        assert!(!RandomIndex::for_size(15).approximate);
    }

    #[test]
    fn random_index_beyond_table_is_approximate() {
        let ri = RandomIndex::for_size(22);
        assert_eq!(ri.value, 1.59);
        assert!(ri.approximate);
    }

    #[test]
    fn small_matrices_are_always_consistent() {
        let report = report_for(&[vec![1.0, 9.0], vec![1.0 / 9.0, 1.0]]);
        assert_eq!(report.consistency_index, 0.0);
        assert_eq!(report.consistency_ratio, 0.0);
        assert!(report.is_consistent());
        assert!(report.worst_pair.is_none());
    }

    #[test]
    fn single_element_has_zero_ratio() {
        let snapshot = MatrixSnapshot::from_rows(&[vec![1.0]]).unwrap();
        let report = ConsistencyValidator::default()
            .evaluate(&snapshot, &PriorityVector::unit(), 1.0)
            .unwrap();
        assert_eq!(report.consistency_ratio, 0.0);
        assert!(report.is_consistent());
    }

    #[test]
    fn perfectly_consistent_matrix_passes_without_worst_pair() {
        let report = report_for(&[
            vec![1.0, 2.0, 4.0],
            vec![0.5, 1.0, 2.0],
            vec![0.25, 0.5, 1.0],
        ]);
        assert!(report.consistency_ratio < 1e-9);
        assert!(report.is_consistent());
        assert!(report.worst_pair.is_none());
    }

    #[test]
    fn intransitive_judgments_fail_and_name_worst_pair() {
        // A > B, B > C, but C > A.
        let report = report_for(&[
            vec![1.0, 5.0, 0.2],
            vec![0.2, 1.0, 5.0],
            vec![5.0, 0.2, 1.0],
        ]);
        assert!(report.consistency_ratio > CONSISTENCY_THRESHOLD);
        assert_eq!(report.verdict, ConsistencyVerdict::Inconsistent);

        let worst = report.worst_pair.unwrap();
        assert!(worst.deviation > 1.0);
        assert!(worst.row < worst.col);
    }

    #[test]
    fn maximal_intensity_cycle_is_grossly_inconsistent() {
        // A > B, B > C and C > A, each at 9.
        let ninth = 1.0 / 9.0;
        let report = report_for(&[
            vec![1.0, 9.0, ninth],
            vec![ninth, 1.0, 9.0],
            vec![9.0, ninth, 1.0],
        ]);

        // Uniform weights, lambda_max = 1 + 9 + 1/9.
        let expected_ci = (1.0 + 9.0 + ninth - 3.0) / 2.0;
        assert!((report.consistency_index - expected_ci).abs() < 1e-6);
        assert!((report.consistency_ratio - expected_ci / 0.58).abs() < 1e-6);
        assert_eq!(report.verdict, ConsistencyVerdict::Inconsistent);
        assert!((report.worst_pair.unwrap().deviation - 9.0).abs() < 1e-6);
    }

    #[test]
    fn mildly_inconsistent_matrix_passes_with_a_revision_hint() {
        let report = report_for(&[
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 2.0],
            vec![0.2, 0.5, 1.0],
        ]);
        assert!(report.consistency_ratio > 0.0);
        assert!(report.is_consistent());
        assert!(report.worst_pair.is_some());
    }

    #[test]
    fn threshold_is_configurable() {
        let snapshot = MatrixSnapshot::from_rows(&[
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 2.0],
            vec![0.2, 0.5, 1.0],
        ])
        .unwrap();
        let derivation = PriorityEngine::default().derive(&snapshot).unwrap();
        let report = ConsistencyValidator::new(1e-6)
            .evaluate(&snapshot, &derivation.vector, derivation.lambda_max)
            .unwrap();
        assert!(!report.is_consistent());
        assert_eq!(report.threshold, 1e-6);
    }

    #[test]
    fn mismatched_vector_is_rejected() {
        let snapshot = MatrixSnapshot::from_rows(&[vec![1.0, 2.0], vec![0.5, 1.0]]).unwrap();
        assert!(matches!(
            ConsistencyValidator::default().evaluate(&snapshot, &PriorityVector::unit(), 2.0),
            Err(ComparisonError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn consistency_index_is_clamped() {
        assert_eq!(ConsistencyValidator::consistency_index(4, 3.9999999), 0.0);
        assert!((ConsistencyValidator::consistency_index(4, 4.3) - 0.1).abs() < 1e-12);
    }
}
