//! Aggregation Engine - combines evaluators' vectors into one group result.
//!
//! Uses the weighted geometric mean, which keeps the ratio-scale meaning of
//! the weights. The arithmetic mean does not.

use serde::{Deserialize, Serialize};

use super::{ConsistencyReport, PriorityVector};
use crate::domain::comparison::ComparisonError;
use crate::domain::foundation::EvaluatorId;

/// One evaluator's priorities for a single matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorResult {
    pub evaluator_id: EvaluatorId,
    pub vector: PriorityVector,
    /// Absent when weights were supplied directly rather than derived here.
    pub consistency: Option<ConsistencyReport>,
}

impl EvaluatorResult {
    pub fn new(evaluator_id: EvaluatorId, vector: PriorityVector) -> Self {
        Self {
            evaluator_id,
            vector,
            consistency: None,
        }
    }

    pub fn with_consistency(mut self, report: ConsistencyReport) -> Self {
        self.consistency = Some(report);
        self
    }
}

/// One position of the final ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedNode {
    /// Index into sibling order.
    pub index: usize,
    /// 1-based rank.
    pub rank: usize,
    pub weight: f64,
}

/// Aggregated vector plus ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPriority {
    pub vector: PriorityVector,
    pub ranking: Vec<RankedNode>,
    /// Normalized evaluator weights actually applied, aligned to the input.
    pub evaluator_weights: Vec<f64>,
}

/// Ranks a vector descending, ties in sibling order.
pub fn rank(vector: &PriorityVector) -> Vec<RankedNode> {
    vector
        .ranking()
        .into_iter()
        .enumerate()
        .map(|(position, index)| RankedNode {
            index,
            rank: position + 1,
            weight: vector.weights()[index],
        })
        .collect()
}

pub struct AggregationEngine;

impl AggregationEngine {
    /// Aggregates evaluator results for the same matrix.
    ///
    /// `evaluator_weights`, when given, is aligned with `results`; each weight
    /// must be positive and the set is normalized before use. Without it every
    /// evaluator counts equally.
    pub fn aggregate(
        results: &[EvaluatorResult],
        evaluator_weights: Option<&[f64]>,
    ) -> Result<GroupPriority, ComparisonError> {
        let first = results.first().ok_or(ComparisonError::EmptyEvaluatorSet)?;
        let n = first.vector.len();

        if let Some(mismatch) = results.iter().find(|r| r.vector.len() != n) {
            return Err(ComparisonError::MismatchedDimension {
                evaluator_id: mismatch.evaluator_id,
                expected: n,
                actual: mismatch.vector.len(),
            });
        }

        let exponents = Self::normalized_weights(results, evaluator_weights)?;

        let combined = (0..n)
            .map(|i| {
                results
                    .iter()
                    .zip(&exponents)
                    .map(|(result, lambda)| result.vector.weights()[i].powf(*lambda))
                    .product::<f64>()
            })
            .collect::<Vec<_>>();

        let vector = PriorityVector::normalize(combined)
            .map_err(|_| ComparisonError::DegenerateAggregation)?;
        let ranking = rank(&vector);

        Ok(GroupPriority {
            vector,
            ranking,
            evaluator_weights: exponents,
        })
    }

    fn normalized_weights(
        results: &[EvaluatorResult],
        evaluator_weights: Option<&[f64]>,
    ) -> Result<Vec<f64>, ComparisonError> {
        let k = results.len();
        let Some(weights) = evaluator_weights else {
            return Ok(vec![1.0 / k as f64; k]);
        };

        if weights.len() != k {
            return Err(ComparisonError::SizeMismatch {
                expected: k,
                actual: weights.len(),
            });
        }
        if let Some((result, weight)) = results
            .iter()
            .zip(weights)
            .find(|(_, w)| !w.is_finite() || **w <= 0.0)
        {
            return Err(ComparisonError::InvalidEvaluatorWeight {
                evaluator_id: result.evaluator_id,
                weight: *weight,
            });
        }

        let total: f64 = weights.iter().sum();
        Ok(weights.iter().map(|w| w / total).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(weights: Vec<f64>) -> EvaluatorResult {
        EvaluatorResult::new(EvaluatorId::new(), PriorityVector::try_new(weights).unwrap())
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            AggregationEngine::aggregate(&[], None),
            Err(ComparisonError::EmptyEvaluatorSet)
        );
    }

    #[test]
    fn mismatched_dimension_names_evaluator() {
        let odd = result(vec![0.5, 0.5]);
        let odd_id = odd.evaluator_id;
        let err = AggregationEngine::aggregate(&[result(vec![0.2, 0.3, 0.5]), odd], None)
            .unwrap_err();
        assert_eq!(
            err,
            ComparisonError::MismatchedDimension {
                evaluator_id: odd_id,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn single_evaluator_passes_through() {
        let group = AggregationEngine::aggregate(&[result(vec![0.6, 0.3, 0.1])], None).unwrap();
        let w = group.vector.weights();
        assert!((w[0] - 0.6).abs() < 1e-12);
        assert!((w[2] - 0.1).abs() < 1e-12);
        assert_eq!(group.evaluator_weights, vec![1.0]);
    }

    #[test]
    fn geometric_mean_of_two_evaluators() {
        let group = AggregationEngine::aggregate(
            &[result(vec![0.8, 0.2]), result(vec![0.2, 0.8])],
            None,
        )
        .unwrap();
        let w = group.vector.weights();
        assert!((w[0] - 0.5).abs() < 1e-12);
        assert!((w[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn evaluator_weights_are_normalized_and_applied() {
        // Exponents 3/4 and 1/4 after normalizing [3, 1].
        let group = AggregationEngine::aggregate(
            &[result(vec![0.8, 0.2]), result(vec![0.2, 0.8])],
            Some(&[3.0, 1.0]),
        )
        .unwrap();
        assert_eq!(group.evaluator_weights, vec![0.75, 0.25]);

        let a = 0.8f64.powf(0.75) * 0.2f64.powf(0.25);
        let b = 0.2f64.powf(0.75) * 0.8f64.powf(0.25);
        assert!((group.vector.weights()[0] - a / (a + b)).abs() < 1e-12);
        assert_eq!(group.ranking[0].index, 0);
    }

    #[test]
    fn non_positive_evaluator_weight_is_rejected() {
        let second = result(vec![0.5, 0.5]);
        let id = second.evaluator_id;
        let err = AggregationEngine::aggregate(&[result(vec![0.5, 0.5]), second], Some(&[1.0, 0.0]))
            .unwrap_err();
        assert_eq!(
            err,
            ComparisonError::InvalidEvaluatorWeight {
                evaluator_id: id,
                weight: 0.0
            }
        );
    }

    #[test]
    fn weight_count_must_match_evaluators() {
        assert!(matches!(
            AggregationEngine::aggregate(&[result(vec![1.0])], Some(&[1.0, 2.0])),
            Err(ComparisonError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn disjoint_zero_weights_collapse() {
        let err = AggregationEngine::aggregate(
            &[result(vec![1.0, 0.0]), result(vec![0.0, 1.0])],
            None,
        )
        .unwrap_err();
        assert_eq!(err, ComparisonError::DegenerateAggregation);
    }

    #[test]
    fn ranking_is_one_based_with_sibling_tie_break() {
        let group = AggregationEngine::aggregate(&[result(vec![0.25, 0.5, 0.25])], None).unwrap();
        let order: Vec<_> = group.ranking.iter().map(|r| (r.index, r.rank)).collect();
        assert_eq!(order, vec![(1, 1), (0, 2), (2, 3)]);
    }

    proptest! {
        #[test]
        fn identical_inputs_aggregate_to_themselves(
            raw in prop::collection::vec(0.01f64..10.0, 1..10),
            k in 1usize..6,
        ) {
            let vector = PriorityVector::normalize(raw).unwrap();
            let results: Vec<_> = (0..k)
                .map(|_| EvaluatorResult::new(EvaluatorId::new(), vector.clone()))
                .collect();
            let group = AggregationEngine::aggregate(&results, None).unwrap();
            for (a, b) in group.vector.weights().iter().zip(vector.weights()) {
                prop_assert!((a - b).abs() < 1e-9);
            }
        }
    }
}
