//! SynthesizeHierarchyHandler - Global leaf weights for one evaluator.
//!
//! Derives every parent's local priorities in one parallel batch and rolls
//! them down the tree. Every matrix in the tree must be complete.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::foundation::{
    DomainError, ErrorCode, EvaluatorId, MatrixKey, NodeId, Timestamp,
};
use crate::domain::hierarchy::{GlobalPriorities, HierarchySynthesizer};
use crate::domain::priority::{ConsistencyValidator, PriorityEngine, PriorityResult};
use crate::ports::{HierarchyReader, JudgmentRepository};

use super::loader::load_matrix;
use super::HandlerError;

#[derive(Debug, Clone)]
pub struct SynthesizeHierarchyCommand {
    pub root_id: NodeId,
    pub evaluator_id: EvaluatorId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyPrioritiesView {
    pub root_id: NodeId,
    pub evaluator_id: EvaluatorId,
    pub global: GlobalPriorities,
    /// One result per parent, in traversal order.
    pub local: Vec<PriorityResult>,
}

impl HierarchyPrioritiesView {
    /// Parents whose matrices exceed the consistency threshold.
    pub fn inconsistent_parents(&self) -> Vec<NodeId> {
        self.local
            .iter()
            .filter(|r| !r.consistency.is_consistent())
            .map(|r| r.matrix.parent_id)
            .collect()
    }
}

pub struct SynthesizeHierarchyHandler {
    repository: Arc<dyn JudgmentRepository>,
    hierarchy: Arc<dyn HierarchyReader>,
    engine: PriorityEngine,
    validator: ConsistencyValidator,
    max_fan_out: usize,
}

impl SynthesizeHierarchyHandler {
    pub fn new(
        repository: Arc<dyn JudgmentRepository>,
        hierarchy: Arc<dyn HierarchyReader>,
        engine: PriorityEngine,
        validator: ConsistencyValidator,
        max_fan_out: usize,
    ) -> Self {
        Self {
            repository,
            hierarchy,
            engine,
            validator,
            max_fan_out,
        }
    }

    pub async fn handle(
        &self,
        cmd: SynthesizeHierarchyCommand,
    ) -> Result<HierarchyPrioritiesView, HandlerError> {
        // 1. Load the tree and every parent's matrix
        let tree = self
            .hierarchy
            .hierarchy(cmd.root_id)
            .await?
            .ok_or(HandlerError::NodeNotFound(cmd.root_id))?;

        let parents = tree.parents();
        let mut snapshots = Vec::with_capacity(parents.len());
        for parent_id in &parents {
            let key = MatrixKey::new(*parent_id, cmd.evaluator_id);
            let (_, matrix) = load_matrix(
                self.repository.as_ref(),
                self.hierarchy.as_ref(),
                &key,
                self.max_fan_out,
            )
            .await?;
            let snapshot = matrix.snapshot();
            snapshot.ensure_complete()?;
            snapshots.push(snapshot);
        }

        // 2. Derive all matrices off the async runtime
        let engine = self.engine;
        let (snapshots, derivations) = tokio::task::spawn_blocking(move || {
            let derivations = engine.derive_batch(&snapshots);
            (snapshots, derivations)
        })
        .await
        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        // 3. Consistency per parent, then roll down the tree
        let computed_at = Timestamp::now();
        let mut local = Vec::with_capacity(parents.len());
        let mut vectors = HashMap::with_capacity(parents.len());
        for ((parent_id, snapshot), derivation) in
            parents.iter().zip(&snapshots).zip(derivations)
        {
            let derivation = derivation?;
            let consistency =
                self.validator
                    .evaluate(snapshot, &derivation.vector, derivation.lambda_max)?;
            if !consistency.is_consistent() {
                warn!(
                    parent_id = %parent_id,
                    cr = consistency.consistency_ratio,
                    "parent matrix exceeds consistency threshold"
                );
            }

            vectors.insert(*parent_id, derivation.vector.clone());
            local.push(PriorityResult {
                matrix: MatrixKey::new(*parent_id, cmd.evaluator_id),
                vector: derivation.vector,
                lambda_max: derivation.lambda_max,
                method: derivation.method,
                consistency,
                computed_at,
            });
        }

        let global = HierarchySynthesizer::synthesize(&tree, &vectors)?;

        debug!(
            root_id = %cmd.root_id,
            evaluator_id = %cmd.evaluator_id,
            matrices = local.len(),
            alternatives = global.alternatives.len(),
            "hierarchy synthesized"
        );

        Ok(HierarchyPrioritiesView {
            root_id: cmd.root_id,
            evaluator_id: cmd.evaluator_id,
            global,
            local,
        })
    }
}
