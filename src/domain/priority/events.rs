//! Priority domain events.
//!
//! Published by the application layer after a computation completes so that
//! downstream consumers can refresh without polling.

use serde::{Deserialize, Serialize};

use super::{ConsistencyVerdict, PriorityResult};
use crate::domain::foundation::{domain_event, EvaluatorId, EventId, MatrixKey, NodeId, Timestamp};

/// Published when one evaluator's priorities are derived for a matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrioritiesDerived {
    pub event_id: EventId,
    pub matrix: MatrixKey,
    pub parent_id: NodeId,
    pub weights: Vec<f64>,
    pub consistency_ratio: f64,
    pub verdict: ConsistencyVerdict,
    /// True when the geometric-mean fallback or an extrapolated random index was used.
    pub approximate: bool,
    pub derived_at: Timestamp,
}

impl PrioritiesDerived {
    pub fn from_result(result: &PriorityResult) -> Self {
        Self {
            event_id: EventId::new(),
            matrix: result.matrix,
            parent_id: result.matrix.parent_id,
            weights: result.vector.weights().to_vec(),
            consistency_ratio: result.consistency.consistency_ratio,
            verdict: result.consistency.verdict,
            approximate: result.is_approximate(),
            derived_at: result.computed_at,
        }
    }
}

domain_event!(
    PrioritiesDerived,
    event_type = "priority.derived.v1",
    schema_version = 1,
    aggregate_id = parent_id,
    aggregate_type = "ComparisonMatrix",
    occurred_at = derived_at,
    event_id = event_id
);

/// Published when evaluators' priorities are combined into a group result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPriorityAggregated {
    pub event_id: EventId,
    pub parent_id: NodeId,
    pub evaluators: Vec<EvaluatorId>,
    pub weights: Vec<f64>,
    /// Node ids from highest to lowest aggregated weight.
    pub ranked_nodes: Vec<NodeId>,
    pub aggregated_at: Timestamp,
}

domain_event!(
    GroupPriorityAggregated,
    event_type = "priority.group_aggregated.v1",
    schema_version = 1,
    aggregate_id = parent_id,
    aggregate_type = "ComparisonMatrix",
    occurred_at = aggregated_at,
    event_id = event_id
);
