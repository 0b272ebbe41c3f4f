//! A validated goal → criteria → alternatives tree.

use std::collections::{HashMap, HashSet};

use super::{HierarchyError, Node, SiblingSet};
use crate::domain::foundation::NodeId;

/// Immutable hierarchy with exactly one root and every node reachable.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
    children: HashMap<NodeId, SiblingSet>,
}

impl Hierarchy {
    /// Builds the tree from a flat node list.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, HierarchyError> {
        if nodes.is_empty() {
            return Err(HierarchyError::Empty);
        }

        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut root = None;
        for node in nodes {
            if node.parent_id.is_none() {
                if let Some(existing) = root {
                    return Err(HierarchyError::MultipleRoots(existing, node.id));
                }
                root = Some(node.id);
            }
            let id = node.id;
            if by_id.insert(id, node).is_some() {
                return Err(HierarchyError::DuplicateNode(id));
            }
        }
        let root = root.ok_or(HierarchyError::NoRoot)?;

        let mut grouped: HashMap<NodeId, Vec<Node>> = HashMap::new();
        for node in by_id.values() {
            if let Some(parent) = node.parent_id {
                if !by_id.contains_key(&parent) {
                    return Err(HierarchyError::MissingParent {
                        node: node.id,
                        parent,
                    });
                }
                grouped.entry(parent).or_default().push(node.clone());
            }
        }

        let children = grouped
            .into_iter()
            .map(|(parent, nodes)| SiblingSet::new(parent, nodes).map(|set| (parent, set)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        let hierarchy = Self {
            root,
            nodes: by_id,
            children,
        };
        hierarchy.ensure_connected()?;
        Ok(hierarchy)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Ordered children of `parent`, or `None` for a leaf.
    pub fn children(&self, parent: NodeId) -> Option<&SiblingSet> {
        self.children.get(&parent)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        !self.children.contains_key(&id)
    }

    /// Depth-first pre-order, siblings in order index order.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(set) = self.children.get(&id) {
                stack.extend(set.nodes().iter().rev().map(|n| n.id));
            }
        }
        order
    }

    /// Every node with children, in traversal order. One matrix per parent.
    pub fn parents(&self) -> Vec<NodeId> {
        self.traverse()
            .into_iter()
            .filter(|id| !self.is_leaf(*id))
            .collect()
    }

    /// Leaf nodes (the alternatives) in traversal order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.traverse()
            .into_iter()
            .filter(|id| self.is_leaf(*id))
            .collect()
    }

    fn ensure_connected(&self) -> Result<(), HierarchyError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if seen.insert(id) {
                if let Some(set) = self.children.get(&id) {
                    stack.extend(set.nodes().iter().map(|n| n.id));
                }
            }
        }
        match self.nodes.keys().find(|id| !seen.contains(*id)) {
            Some(id) => Err(HierarchyError::Unreachable(*id)),
            None => Ok(()),
        }
    }
}
