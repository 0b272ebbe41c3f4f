//! ComputePrioritiesHandler - Derives and stores one evaluator's priorities.
//!
//! Refuses incomplete matrices. An inconsistent result is still stored and
//! returned; the verdict travels with it for the caller to act on.
//!
//! The matrix lock is held from load to `save_result`, so a stored result
//! always belongs to the judgments it was derived from.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::{
    DomainError, ErrorCode, MatrixKey, NodeId, SerializableDomainEvent,
};
use crate::domain::priority::{
    ConsistencyValidator, PrioritiesDerived, PriorityEngine, PriorityResult,
};
use crate::ports::{EventPublisher, HierarchyReader, JudgmentRepository};

use super::loader::load_matrix;
use super::{HandlerError, MatrixLocks};

#[derive(Debug, Clone)]
pub struct ComputePrioritiesCommand {
    pub key: MatrixKey,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrioritiesView {
    pub result: PriorityResult,
    /// Node ids aligned with `result.vector`.
    pub node_ids: Vec<NodeId>,
}

pub struct ComputePrioritiesHandler {
    repository: Arc<dyn JudgmentRepository>,
    hierarchy: Arc<dyn HierarchyReader>,
    publisher: Arc<dyn EventPublisher>,
    locks: MatrixLocks,
    engine: PriorityEngine,
    validator: ConsistencyValidator,
    max_fan_out: usize,
}

impl ComputePrioritiesHandler {
    pub fn new(
        repository: Arc<dyn JudgmentRepository>,
        hierarchy: Arc<dyn HierarchyReader>,
        publisher: Arc<dyn EventPublisher>,
        locks: MatrixLocks,
        engine: PriorityEngine,
        validator: ConsistencyValidator,
        max_fan_out: usize,
    ) -> Self {
        Self {
            repository,
            hierarchy,
            publisher,
            locks,
            engine,
            validator,
            max_fan_out,
        }
    }

    pub async fn handle(&self, cmd: ComputePrioritiesCommand) -> Result<PrioritiesView, HandlerError> {
        let guard = self.locks.acquire(cmd.key).await;

        // 1. Load and snapshot the matrix
        let (siblings, matrix) = load_matrix(
            self.repository.as_ref(),
            self.hierarchy.as_ref(),
            &cmd.key,
            self.max_fan_out,
        )
        .await?;
        let snapshot = matrix.snapshot();

        // 2. Pure computation
        let result = PriorityResult::compute(cmd.key, &snapshot, &self.engine, &self.validator)?;

        if result.method.is_approximate() {
            warn!(matrix = %cmd.key, "power iteration did not converge, using geometric mean");
        }
        if !result.consistency.is_consistent() {
            warn!(
                matrix = %cmd.key,
                cr = result.consistency.consistency_ratio,
                worst_pair = ?result.consistency.worst_pair.map(|w| (w.row, w.col)),
                "matrix exceeds consistency threshold"
            );
        }

        // 3. Persist and announce
        self.repository.save_result(&result).await?;
        drop(guard);
        let envelope = PrioritiesDerived::from_result(&result)
            .to_envelope()
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
        self.publisher.publish(envelope).await?;

        debug!(
            matrix = %cmd.key,
            size = snapshot.size(),
            lambda_max = result.lambda_max,
            cr = result.consistency.consistency_ratio,
            "priorities derived"
        );

        Ok(PrioritiesView {
            result,
            node_ids: siblings.node_ids(),
        })
    }
}
