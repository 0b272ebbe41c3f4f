//! Priority engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::priority::{
    ConsistencyValidator, PriorityEngine, CONSISTENCY_THRESHOLD, DEFAULT_CONVERGENCE_TOLERANCE,
    DEFAULT_MAX_ITERATIONS,
};

/// Hard ceiling on children per parent; a matrix of 50 needs 1225 judgments.
pub const FAN_OUT_CEILING: usize = 50;

/// Numerical and sizing parameters of the engine
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Largest acceptable consistency ratio
    #[serde(default = "default_threshold")]
    pub consistency_threshold: f64,

    /// Power iteration cap before falling back to the geometric mean
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// L1 change between iterations that counts as converged
    #[serde(default = "default_tolerance")]
    pub convergence_tolerance: f64,

    /// Maximum children compared under one parent
    #[serde(default = "default_max_fan_out")]
    pub max_fan_out: usize,
}

impl EngineConfig {
    pub fn priority_engine(&self) -> PriorityEngine {
        PriorityEngine::new(self.max_iterations, self.convergence_tolerance)
    }

    pub fn consistency_validator(&self) -> ConsistencyValidator {
        ConsistencyValidator::new(self.consistency_threshold)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.consistency_threshold > 0.0 && self.consistency_threshold <= 1.0) {
            return Err(ValidationError::InvalidConsistencyThreshold(
                self.consistency_threshold,
            ));
        }
        if self.max_iterations == 0 {
            return Err(ValidationError::InvalidMaxIterations);
        }
        if !(self.convergence_tolerance > 0.0 && self.convergence_tolerance <= 1e-3) {
            return Err(ValidationError::InvalidTolerance(self.convergence_tolerance));
        }
        if self.max_fan_out == 0 || self.max_fan_out > FAN_OUT_CEILING {
            return Err(ValidationError::InvalidFanOut {
                actual: self.max_fan_out,
                max: FAN_OUT_CEILING,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            consistency_threshold: default_threshold(),
            max_iterations: default_max_iterations(),
            convergence_tolerance: default_tolerance(),
            max_fan_out: default_max_fan_out(),
        }
    }
}

fn default_threshold() -> f64 {
    CONSISTENCY_THRESHOLD
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_tolerance() -> f64 {
    DEFAULT_CONVERGENCE_TOLERANCE
}

fn default_max_fan_out() -> usize {
    20
}
