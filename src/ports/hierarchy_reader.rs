//! Hierarchy reader port.
//!
//! Hierarchy authoring lives outside this crate. The engine only needs the
//! stable, ordered children of a parent to size and label its matrix.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NodeId};
use crate::domain::hierarchy::{Hierarchy, SiblingSet};

#[async_trait]
pub trait HierarchyReader: Send + Sync {
    /// Ordered children of `parent_id`.
    ///
    /// Returns `None` if the node is unknown or has no children.
    async fn siblings(&self, parent_id: NodeId) -> Result<Option<SiblingSet>, DomainError>;

    /// The whole tree rooted at `root_id`, or `None` if unknown.
    async fn hierarchy(&self, root_id: NodeId) -> Result<Option<Hierarchy>, DomainError>;
}
