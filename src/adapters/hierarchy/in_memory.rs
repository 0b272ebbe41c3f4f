//! In-memory hierarchy store.
//!
//! Hierarchies are authored elsewhere; this adapter holds validated trees
//! that were registered directly or loaded from a JSON node list.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, NodeId};
use crate::domain::hierarchy::{Hierarchy, Node, SiblingSet};
use crate::ports::HierarchyReader;

#[derive(Debug, Clone, Default)]
pub struct InMemoryHierarchy {
    trees: Arc<RwLock<HashMap<NodeId, Hierarchy>>>,
}

impl InMemoryHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a tree. Returns its root id.
    pub async fn insert_nodes(&self, nodes: Vec<Node>) -> Result<NodeId, DomainError> {
        let hierarchy = Hierarchy::from_nodes(nodes)?;
        let root = hierarchy.root();
        self.trees.write().await.insert(root, hierarchy);
        Ok(root)
    }

    /// Loads one tree from a JSON array of nodes.
    pub async fn load_json_file(&self, path: &Path) -> Result<NodeId, DomainError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::storage(format!("{}: {}", path.display(), e)))?;
        let nodes: Vec<Node> = serde_json::from_str(&json).map_err(|e| {
            DomainError::new(
                ErrorCode::InvalidHierarchy,
                format!("Failed to parse {}: {}", path.display(), e),
            )
        })?;
        self.insert_nodes(nodes).await
    }

    pub async fn tree_count(&self) -> usize {
        self.trees.read().await.len()
    }
}

#[async_trait]
impl HierarchyReader for InMemoryHierarchy {
    async fn siblings(&self, parent_id: NodeId) -> Result<Option<SiblingSet>, DomainError> {
        Ok(self
            .trees
            .read()
            .await
            .values()
            .find_map(|tree| tree.children(parent_id).cloned()))
    }

    async fn hierarchy(&self, root_id: NodeId) -> Result<Option<Hierarchy>, DomainError> {
        Ok(self.trees.read().await.get(&root_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn serves_siblings_of_registered_tree() {
        let store = InMemoryHierarchy::new();
        let goal = Node::root("Goal");
        let goal_id = goal.id;
        let nodes = vec![
            Node::child(goal_id, "B", 1),
            Node::child(goal_id, "A", 0),
            goal,
        ];
        let root = store.insert_nodes(nodes).await.unwrap();
        assert_eq!(root, goal_id);

        let siblings = store.siblings(goal_id).await.unwrap().unwrap();
        assert_eq!(siblings.nodes()[0].name, "A");
        assert!(store.siblings(NodeId::new()).await.unwrap().is_none());
        assert!(store.hierarchy(goal_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rejects_invalid_tree() {
        let store = InMemoryHierarchy::new();
        let err = store
            .insert_nodes(vec![Node::root("A"), Node::root("B")])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidHierarchy);
        assert_eq!(store.tree_count().await, 0);
    }

    #[tokio::test]
    async fn loads_nodes_from_json() {
        let dir = TempDir::new().unwrap();
        let goal = Node::root("Goal");
        let nodes = vec![goal.clone(), Node::child(goal.id, "Only", 0)];
        let path = dir.path().join("hierarchy.json");
        std::fs::write(&path, serde_json::to_string(&nodes).unwrap()).unwrap();

        let store = InMemoryHierarchy::new();
        assert_eq!(store.load_json_file(&path).await.unwrap(), goal.id);
        assert_eq!(store.siblings(goal.id).await.unwrap().unwrap().len(), 1);
    }
}
