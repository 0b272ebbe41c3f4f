//! Stored outcome of a priority computation for one matrix.

use serde::{Deserialize, Serialize};

use super::{
    ConsistencyReport, ConsistencyValidator, DerivationMethod, EvaluatorResult, PriorityEngine,
    PriorityVector,
};
use crate::domain::comparison::{ComparisonError, MatrixSnapshot};
use crate::domain::foundation::{MatrixKey, Timestamp};

/// Priorities plus consistency for one matrix version.
///
/// Regenerated wholesale whenever the matrix changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub matrix: MatrixKey,
    pub vector: PriorityVector,
    pub lambda_max: f64,
    pub method: DerivationMethod,
    pub consistency: ConsistencyReport,
    pub computed_at: Timestamp,
}

impl PriorityResult {
    /// Runs the engine and validator over a complete snapshot.
    pub fn compute(
        matrix: MatrixKey,
        snapshot: &MatrixSnapshot,
        engine: &PriorityEngine,
        validator: &ConsistencyValidator,
    ) -> Result<Self, ComparisonError> {
        let derivation = engine.derive(snapshot)?;
        let consistency =
            validator.evaluate(snapshot, &derivation.vector, derivation.lambda_max)?;
        Ok(Self {
            matrix,
            vector: derivation.vector,
            lambda_max: derivation.lambda_max,
            method: derivation.method,
            consistency,
            computed_at: Timestamp::now(),
        })
    }

    pub fn is_approximate(&self) -> bool {
        self.method.is_approximate() || self.consistency.random_index.approximate
    }

    /// View of this result as one evaluator's input to aggregation.
    pub fn to_evaluator_result(&self) -> EvaluatorResult {
        EvaluatorResult::new(self.matrix.evaluator_id, self.vector.clone())
            .with_consistency(self.consistency.clone())
    }
}
