//! Hierarchy Synthesizer - rolls local priorities up into global weights.
//!
//! Global weight of a child = global weight of its parent × its local weight.
//! The root has global weight 1. Leaves are the alternatives being ranked.

use serde::Serialize;
use std::collections::HashMap;

use super::{Hierarchy, HierarchyError};
use crate::domain::foundation::NodeId;
use crate::domain::priority::PriorityVector;

/// Global weight of one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlobalWeight {
    pub node_id: NodeId,
    pub weight: f64,
    /// 1-based; ties keep traversal order.
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalPriorities {
    /// Leaves ranked by global weight, highest first.
    pub alternatives: Vec<GlobalWeight>,
}

impl GlobalPriorities {
    pub fn weight_of(&self, node_id: NodeId) -> Option<f64> {
        self.alternatives
            .iter()
            .find(|g| g.node_id == node_id)
            .map(|g| g.weight)
    }
}

pub struct HierarchySynthesizer;

impl HierarchySynthesizer {
    /// Combines one local vector per parent into leaf global weights.
    ///
    /// `local` is keyed by parent id and aligned to that parent's sibling order.
    pub fn synthesize(
        hierarchy: &Hierarchy,
        local: &HashMap<NodeId, PriorityVector>,
    ) -> Result<GlobalPriorities, HierarchyError> {
        let mut global: HashMap<NodeId, f64> = HashMap::with_capacity(hierarchy.len());
        global.insert(hierarchy.root(), 1.0);

        // Traversal visits every parent before its children.
        for id in hierarchy.traverse() {
            let Some(children) = hierarchy.children(id) else {
                continue;
            };
            let vector = local
                .get(&id)
                .ok_or(HierarchyError::MissingLocalPriorities(id))?;
            if vector.len() != children.len() {
                return Err(HierarchyError::MismatchedDimension {
                    parent: id,
                    expected: children.len(),
                    actual: vector.len(),
                });
            }

            let parent_weight = global.get(&id).copied().unwrap_or_default();
            for (child, w) in children.nodes().iter().zip(vector.weights()) {
                global.insert(child.id, parent_weight * w);
            }
        }

        let mut leaves: Vec<(NodeId, f64)> = hierarchy
            .leaves()
            .into_iter()
            .map(|id| (id, global.get(&id).copied().unwrap_or_default()))
            .collect();
        leaves.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(GlobalPriorities {
            alternatives: leaves
                .into_iter()
                .enumerate()
                .map(|(position, (node_id, weight))| GlobalWeight {
                    node_id,
                    weight,
                    rank: position + 1,
                })
                .collect(),
        })
    }
}
