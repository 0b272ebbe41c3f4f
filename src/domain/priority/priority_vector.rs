//! Normalized priority weights and how they were derived.

use serde::{Deserialize, Serialize};

use crate::domain::comparison::ComparisonError;

/// Allowed drift of the weight sum from 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Non-negative weights summing to 1, aligned to sibling order.
///
/// Never mutated after creation; a changed matrix produces a new vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct PriorityVector(Vec<f64>);

impl PriorityVector {
    /// Accepts already-normalized weights.
    pub fn try_new(weights: Vec<f64>) -> Result<Self, ComparisonError> {
        if weights.is_empty() {
            return Err(ComparisonError::invalid_weights("vector is empty"));
        }
        if let Some((index, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ComparisonError::invalid_weights(format!(
                "weight {} at position {} is not a non-negative number",
                w, index
            )));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ComparisonError::invalid_weights(format!(
                "weights sum to {}, expected 1",
                sum
            )));
        }
        Ok(Self(weights))
    }

    /// Scales arbitrary non-negative weights so they sum to 1.
    pub fn normalize(raw: Vec<f64>) -> Result<Self, ComparisonError> {
        let sum: f64 = raw.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            return Err(ComparisonError::invalid_weights(format!(
                "cannot normalize weights summing to {}",
                sum
            )));
        }
        Self::try_new(raw.into_iter().map(|w| w / sum).collect())
    }

    /// The n = 1 vector.
    pub fn unit() -> Self {
        Self(vec![1.0])
    }

    pub fn weights(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Indices ordered by weight descending; equal weights keep sibling order.
    pub fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.0.len()).collect();
        order.sort_by(|&a, &b| self.0[b].total_cmp(&self.0[a]));
        order
    }
}

impl TryFrom<Vec<f64>> for PriorityVector {
    type Error = ComparisonError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_new(weights)
    }
}

impl From<PriorityVector> for Vec<f64> {
    fn from(vector: PriorityVector) -> Self {
        vector.0
    }
}

/// How a priority vector was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DerivationMethod {
    /// Single element; weight 1 without computation.
    Trivial,
    /// Power iteration converged within the bound.
    PowerIteration { iterations: usize },
    /// Power iteration did not converge; geometric-mean estimate returned.
    GeometricMeanFallback,
}

impl DerivationMethod {
    pub fn is_approximate(&self) -> bool {
        matches!(self, DerivationMethod::GeometricMeanFallback)
    }
}

/// Output of the priority engine for one matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityDerivation {
    pub vector: PriorityVector,
    pub lambda_max: f64,
    pub method: DerivationMethod,
}

impl PriorityDerivation {
    pub fn is_approximate(&self) -> bool {
        self.method.is_approximate()
    }
}
