//! Priority Engine - principal eigenvector approximation for a complete matrix.
//!
//! The geometric mean of each row seeds power iteration. If iteration does
//! not settle within the bound, the geometric-mean estimate is returned and
//! flagged approximate instead of failing.

use rayon::prelude::*;

use super::{DerivationMethod, PriorityDerivation, PriorityVector};
use crate::domain::comparison::{ComparisonError, MatrixSnapshot};

/// Default iteration cap for power iteration.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default L1 change between successive vectors that counts as converged.
pub const DEFAULT_CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Derives priority vectors and principal-eigenvalue estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityEngine {
    max_iterations: usize,
    tolerance: f64,
}

impl Default for PriorityEngine {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_CONVERGENCE_TOLERANCE,
        }
    }
}

impl PriorityEngine {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Derives the priority vector and λmax of a complete matrix.
    ///
    /// # Errors
    ///
    /// `IncompleteMatrix` if any pair is unanswered; no partial weights are guessed.
    pub fn derive(&self, snapshot: &MatrixSnapshot) -> Result<PriorityDerivation, ComparisonError> {
        snapshot.ensure_complete()?;

        if snapshot.size() == 1 {
            return Ok(PriorityDerivation {
                vector: PriorityVector::unit(),
                lambda_max: 1.0,
                method: DerivationMethod::Trivial,
            });
        }

        let seed = Self::geometric_mean(snapshot)?;
        let (weights, method) = match self.power_iterate(snapshot, seed.weights()) {
            Some((weights, iterations)) => {
                (weights, DerivationMethod::PowerIteration { iterations })
            }
            None => (seed, DerivationMethod::GeometricMeanFallback),
        };

        let lambda_max = Self::principal_eigenvalue(snapshot, &weights);
        Ok(PriorityDerivation {
            vector: weights,
            lambda_max,
            method,
        })
    }

    /// Derives many independent matrices in parallel, one task per matrix.
    ///
    /// Results are returned in input order.
    pub fn derive_batch(
        &self,
        snapshots: &[MatrixSnapshot],
    ) -> Vec<Result<PriorityDerivation, ComparisonError>> {
        snapshots.par_iter().map(|s| self.derive(s)).collect()
    }

    /// Normalized row geometric means, computed in log space.
    pub fn geometric_mean(snapshot: &MatrixSnapshot) -> Result<PriorityVector, ComparisonError> {
        let n = snapshot.size() as f64;
        let raw = (0..snapshot.size())
            .map(|i| {
                let log_sum: f64 = snapshot.row(i).iter().map(|v| v.ln()).sum();
                (log_sum / n).exp()
            })
            .collect();
        PriorityVector::normalize(raw)
    }

    /// `λmax = (1/n) Σ (A·w)_i / w_i`.
    pub fn principal_eigenvalue(snapshot: &MatrixSnapshot, vector: &PriorityVector) -> f64 {
        let weights = vector.weights();
        let product = snapshot.multiply(weights);
        let n = weights.len() as f64;
        product
            .iter()
            .zip(weights)
            .filter(|(_, w)| **w > 0.0)
            .map(|(aw, w)| aw / w)
            .sum::<f64>()
            / n
    }

    fn power_iterate(
        &self,
        snapshot: &MatrixSnapshot,
        seed: &[f64],
    ) -> Option<(PriorityVector, usize)> {
        let mut current = seed.to_vec();
        for iteration in 1..=self.max_iterations {
            let next = PriorityVector::normalize(snapshot.multiply(&current)).ok()?;
            let change: f64 = next
                .weights()
                .iter()
                .zip(&current)
                .map(|(a, b)| (a - b).abs())
                .sum();
            if change < self.tolerance {
                return Some((next, iteration));
            }
            current = next.into();
        }
        None
    }
}
