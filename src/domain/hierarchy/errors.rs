use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, NodeId};

/// Errors from building a hierarchy or synthesizing global weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    #[error("Hierarchy has no nodes")]
    Empty,

    #[error("Node {0} appears more than once")]
    DuplicateNode(NodeId),

    #[error("Children of {parent} share order index {order}")]
    DuplicateOrder { parent: NodeId, order: u32 },

    #[error("Node {node} does not belong to parent {parent}")]
    ForeignSibling { node: NodeId, parent: NodeId },

    #[error("Node {node} references unknown parent {parent}")]
    MissingParent { node: NodeId, parent: NodeId },

    #[error("Hierarchy has no root node")]
    NoRoot,

    #[error("Hierarchy has more than one root: {0} and {1}")]
    MultipleRoots(NodeId, NodeId),

    #[error("Node {0} is not reachable from the root")]
    Unreachable(NodeId),

    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Node {0} has no children to compare")]
    NoChildren(NodeId),

    #[error("Parent {parent} has {count} children, more than the limit of {max}")]
    FanOutExceeded {
        parent: NodeId,
        count: usize,
        max: usize,
    },

    #[error("No local priorities for parent {0}")]
    MissingLocalPriorities(NodeId),

    #[error("Local priorities for {parent} have {actual} weights, expected {expected}")]
    MismatchedDimension {
        parent: NodeId,
        expected: usize,
        actual: usize,
    },
}

impl HierarchyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HierarchyError::NodeNotFound(_) => ErrorCode::NodeNotFound,
            HierarchyError::MissingLocalPriorities(_) => ErrorCode::IncompleteMatrix,
            HierarchyError::MismatchedDimension { .. } => ErrorCode::MismatchedDimension,
            _ => ErrorCode::InvalidHierarchy,
        }
    }
}

impl From<HierarchyError> for DomainError {
    fn from(err: HierarchyError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
