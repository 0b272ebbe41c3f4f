//! Loads a parent's sibling set and an evaluator's matrix through the ports.

use crate::domain::comparison::ComparisonMatrix;
use crate::domain::foundation::{MatrixKey, NodeId};
use crate::domain::hierarchy::SiblingSet;
use crate::ports::{HierarchyReader, JudgmentRepository};

use super::HandlerError;

/// Children of `parent_id`, or `NodeNotFound`. Enforces the fan-out limit.
pub(crate) async fn load_siblings(
    hierarchy: &dyn HierarchyReader,
    parent_id: NodeId,
    max_fan_out: usize,
) -> Result<SiblingSet, HandlerError> {
    let siblings = hierarchy
        .siblings(parent_id)
        .await?
        .ok_or(HandlerError::NodeNotFound(parent_id))?;
    siblings.ensure_fan_out(max_fan_out)?;
    Ok(siblings)
}

/// Rebuilds the validated matrix for `key` from persisted records.
pub(crate) async fn load_matrix(
    repository: &dyn JudgmentRepository,
    hierarchy: &dyn HierarchyReader,
    key: &MatrixKey,
    max_fan_out: usize,
) -> Result<(SiblingSet, ComparisonMatrix), HandlerError> {
    let siblings = load_siblings(hierarchy, key.parent_id, max_fan_out).await?;
    let records = repository.load_judgments(key).await?;
    let matrix = ComparisonMatrix::from_records(siblings.len(), &records)?;
    Ok((siblings, matrix))
}
