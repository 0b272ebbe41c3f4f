//! Hierarchy nodes and validated sibling groups.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::HierarchyError;
use crate::domain::foundation::NodeId;

/// A goal, criterion or alternative.
///
/// `parent_id` is a lookup reference only; the hierarchy owns nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
}

impl Node {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            order: 0,
            parent_id: None,
        }
    }

    pub fn child(parent_id: NodeId, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            order,
            parent_id: Some(parent_id),
        }
    }
}

/// The ordered children of one parent; the rows of that parent's matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiblingSet {
    parent_id: NodeId,
    nodes: Vec<Node>,
}

impl SiblingSet {
    /// Validates and sorts children by order index.
    pub fn new(parent_id: NodeId, mut nodes: Vec<Node>) -> Result<Self, HierarchyError> {
        if nodes.is_empty() {
            return Err(HierarchyError::NoChildren(parent_id));
        }

        let mut ids = HashSet::new();
        let mut orders = HashSet::new();
        for node in &nodes {
            if node.parent_id != Some(parent_id) {
                return Err(HierarchyError::ForeignSibling {
                    node: node.id,
                    parent: parent_id,
                });
            }
            if !ids.insert(node.id) {
                return Err(HierarchyError::DuplicateNode(node.id));
            }
            if !orders.insert(node.order) {
                return Err(HierarchyError::DuplicateOrder {
                    parent: parent_id,
                    order: node.order,
                });
            }
        }

        nodes.sort_by_key(|n| n.order);
        Ok(Self { parent_id, nodes })
    }

    pub fn parent_id(&self) -> NodeId {
        self.parent_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Matrix row of a child.
    pub fn index_of(&self, node_id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == node_id)
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn ensure_fan_out(&self, max: usize) -> Result<(), HierarchyError> {
        if self.len() > max {
            return Err(HierarchyError::FanOutExceeded {
                parent: self.parent_id,
                count: self.len(),
                max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_children_by_order() {
        let parent = NodeId::new();
        let set = SiblingSet::new(
            parent,
            vec![
                Node::child(parent, "Cost", 2),
                Node::child(parent, "Safety", 0),
                Node::child(parent, "Comfort", 1),
            ],
        )
        .unwrap();

        let names: Vec<_> = set.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Safety", "Comfort", "Cost"]);
        assert_eq!(set.index_of(set.nodes()[2].id), Some(2));
    }

    #[test]
    fn rejects_empty_duplicate_and_foreign_children() {
        let parent = NodeId::new();
        assert_eq!(
            SiblingSet::new(parent, vec![]),
            Err(HierarchyError::NoChildren(parent))
        );

        let a = Node::child(parent, "A", 0);
        assert!(matches!(
            SiblingSet::new(parent, vec![a.clone(), a]),
            Err(HierarchyError::DuplicateNode(_))
        ));

        assert!(matches!(
            SiblingSet::new(
                parent,
                vec![Node::child(parent, "A", 1), Node::child(parent, "B", 1)]
            ),
            Err(HierarchyError::DuplicateOrder { order: 1, .. })
        ));

        assert!(matches!(
            SiblingSet::new(parent, vec![Node::child(NodeId::new(), "X", 0)]),
            Err(HierarchyError::ForeignSibling { .. })
        ));
    }

    #[test]
    fn fan_out_limit_is_enforced() {
        let parent = NodeId::new();
        let set = SiblingSet::new(
            parent,
            (0..3).map(|i| Node::child(parent, format!("N{}", i), i)).collect(),
        )
        .unwrap();
        assert!(set.ensure_fan_out(3).is_ok());
        assert!(matches!(
            set.ensure_fan_out(2),
            Err(HierarchyError::FanOutExceeded { count: 3, max: 2, .. })
        ));
    }
}
