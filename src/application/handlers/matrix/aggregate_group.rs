//! AggregateGroupHandler - Combines several evaluators into one ranking.
//!
//! Two entry points: `handle` takes priority vectors supplied by the caller,
//! `handle_stored` uses the results already computed for each evaluator.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::comparison::ComparisonError;
use crate::domain::foundation::{
    DomainError, ErrorCode, EvaluatorId, EventId, NodeId, SerializableDomainEvent, Timestamp,
};
use crate::domain::hierarchy::SiblingSet;
use crate::domain::priority::{
    AggregationEngine, EvaluatorResult, GroupPriority, GroupPriorityAggregated, PriorityVector,
};
use crate::ports::{EventPublisher, HierarchyReader, JudgmentRepository};

use super::loader::load_siblings;
use super::HandlerError;

/// Weight assumed for an evaluator whose weight was left out while others set one.
pub const DEFAULT_EVALUATOR_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct EvaluatorInput {
    pub evaluator_id: EvaluatorId,
    pub weights: Vec<f64>,
    pub evaluator_weight: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AggregateGroupCommand {
    pub parent_id: NodeId,
    pub evaluators: Vec<EvaluatorInput>,
}

#[derive(Debug, Clone)]
pub struct AggregateStoredCommand {
    pub parent_id: NodeId,
    /// Evaluators not listed count with `DEFAULT_EVALUATOR_WEIGHT`.
    pub evaluator_weights: HashMap<EvaluatorId, f64>,
}

/// A ranked child with its node identity.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNodeView {
    pub node_id: NodeId,
    pub name: String,
    pub rank: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupPriorityView {
    pub parent_id: NodeId,
    pub evaluators: Vec<EvaluatorId>,
    pub group: GroupPriority,
    pub ranking: Vec<RankedNodeView>,
}

pub struct AggregateGroupHandler {
    repository: Arc<dyn JudgmentRepository>,
    hierarchy: Arc<dyn HierarchyReader>,
    publisher: Arc<dyn EventPublisher>,
    max_fan_out: usize,
}

impl AggregateGroupHandler {
    pub fn new(
        repository: Arc<dyn JudgmentRepository>,
        hierarchy: Arc<dyn HierarchyReader>,
        publisher: Arc<dyn EventPublisher>,
        max_fan_out: usize,
    ) -> Self {
        Self {
            repository,
            hierarchy,
            publisher,
            max_fan_out,
        }
    }

    pub async fn handle(&self, cmd: AggregateGroupCommand) -> Result<GroupPriorityView, HandlerError> {
        let siblings =
            load_siblings(self.hierarchy.as_ref(), cmd.parent_id, self.max_fan_out).await?;

        // Untyped wire data is validated into priority vectors first.
        let mut results = Vec::with_capacity(cmd.evaluators.len());
        for input in &cmd.evaluators {
            if input.weights.len() != siblings.len() {
                return Err(ComparisonError::MismatchedDimension {
                    evaluator_id: input.evaluator_id,
                    expected: siblings.len(),
                    actual: input.weights.len(),
                }
                .into());
            }
            let vector = PriorityVector::try_new(input.weights.clone())?;
            results.push(EvaluatorResult::new(input.evaluator_id, vector));
        }

        let weights = if cmd.evaluators.iter().any(|e| e.evaluator_weight.is_some()) {
            Some(
                cmd.evaluators
                    .iter()
                    .map(|e| e.evaluator_weight.unwrap_or(DEFAULT_EVALUATOR_WEIGHT))
                    .collect::<Vec<_>>(),
            )
        } else {
            None
        };

        self.aggregate(&siblings, &results, weights.as_deref())
            .await
    }

    pub async fn handle_stored(
        &self,
        cmd: AggregateStoredCommand,
    ) -> Result<GroupPriorityView, HandlerError> {
        let siblings =
            load_siblings(self.hierarchy.as_ref(), cmd.parent_id, self.max_fan_out).await?;
        let stored = self.repository.list_results(cmd.parent_id).await?;

        let results: Vec<EvaluatorResult> =
            stored.iter().map(|r| r.to_evaluator_result()).collect();
        let weights = (!cmd.evaluator_weights.is_empty()).then(|| {
            results
                .iter()
                .map(|r| {
                    cmd.evaluator_weights
                        .get(&r.evaluator_id)
                        .copied()
                        .unwrap_or(DEFAULT_EVALUATOR_WEIGHT)
                })
                .collect::<Vec<_>>()
        });

        self.aggregate(&siblings, &results, weights.as_deref())
            .await
    }

    async fn aggregate(
        &self,
        siblings: &SiblingSet,
        results: &[EvaluatorResult],
        weights: Option<&[f64]>,
    ) -> Result<GroupPriorityView, HandlerError> {
        let group = AggregationEngine::aggregate(results, weights)?;
        if group.vector.len() != siblings.len() {
            return Err(ComparisonError::SizeMismatch {
                expected: siblings.len(),
                actual: group.vector.len(),
            }
            .into());
        }

        let ranking = group
            .ranking
            .iter()
            .filter_map(|ranked| {
                siblings.get(ranked.index).map(|node| RankedNodeView {
                    node_id: node.id,
                    name: node.name.clone(),
                    rank: ranked.rank,
                    weight: ranked.weight,
                })
            })
            .collect::<Vec<_>>();
        let evaluators: Vec<EvaluatorId> = results.iter().map(|r| r.evaluator_id).collect();

        let event = GroupPriorityAggregated {
            event_id: EventId::new(),
            parent_id: siblings.parent_id(),
            evaluators: evaluators.clone(),
            weights: group.vector.weights().to_vec(),
            ranked_nodes: ranking.iter().map(|r| r.node_id).collect(),
            aggregated_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
        self.publisher.publish(envelope).await?;

        debug!(
            parent_id = %siblings.parent_id(),
            evaluators = evaluators.len(),
            "group priorities aggregated"
        );

        Ok(GroupPriorityView {
            parent_id: siblings.parent_id(),
            evaluators,
            group,
            ranking,
        })
    }
}
