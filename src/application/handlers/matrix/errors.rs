//! Error type shared by the matrix handlers.

use crate::domain::comparison::ComparisonError;
use crate::domain::foundation::{DomainError, ErrorCode, NodeId};
use crate::domain::hierarchy::HierarchyError;

#[derive(Debug, Clone)]
pub enum HandlerError {
    /// Parent node unknown, or it has no children to compare.
    NodeNotFound(NodeId),
    /// Judgment, matrix or aggregation rule violated.
    Comparison(ComparisonError),
    /// Hierarchy shape or synthesis failure.
    Hierarchy(HierarchyError),
    /// Port failure (storage, events).
    Domain(DomainError),
}

impl HandlerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HandlerError::NodeNotFound(_) => ErrorCode::NodeNotFound,
            HandlerError::Comparison(err) => err.code(),
            HandlerError::Hierarchy(err) => err.code(),
            HandlerError::Domain(err) => err.code,
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerError::NodeNotFound(id) => write!(f, "Node {} not found or has no children", id),
            HandlerError::Comparison(err) => write!(f, "{}", err),
            HandlerError::Hierarchy(err) => write!(f, "{}", err),
            HandlerError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<ComparisonError> for HandlerError {
    fn from(err: ComparisonError) -> Self {
        HandlerError::Comparison(err)
    }
}

impl From<HierarchyError> for HandlerError {
    fn from(err: HierarchyError) -> Self {
        HandlerError::Hierarchy(err)
    }
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        HandlerError::Domain(err)
    }
}
