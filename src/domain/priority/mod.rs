//! Priority Module - Pure numeric services over completed comparison matrices.
//!
//! # Components
//!
//! - `PriorityEngine` - Geometric-mean seed refined by power iteration
//! - `ConsistencyValidator` - CI / CR against the random index, worst pair
//! - `AggregationEngine` - Weighted geometric mean across evaluators
//! - `PriorityResult` - Stored outcome for one matrix
//!
//! Nothing here performs I/O or logs; callers persist and log the values
//! these functions return.

mod aggregation;
mod consistency;
mod engine;
mod events;
mod priority_vector;
mod result;

pub use aggregation::{rank, AggregationEngine, EvaluatorResult, GroupPriority, RankedNode};
pub use consistency::{
    ConsistencyReport, ConsistencyValidator, ConsistencyVerdict, RandomIndex, WorstPair,
    CONSISTENCY_THRESHOLD, RANDOM_INDEX,
};
pub use engine::{PriorityEngine, DEFAULT_CONVERGENCE_TOLERANCE, DEFAULT_MAX_ITERATIONS};
pub use events::{GroupPriorityAggregated, PrioritiesDerived};
pub use priority_vector::{
    DerivationMethod, PriorityDerivation, PriorityVector, WEIGHT_SUM_TOLERANCE,
};
pub use result::PriorityResult;
