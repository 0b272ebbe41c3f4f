//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a hierarchy node (goal, criterion, or alternative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Creates a new random NodeId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a NodeId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for an evaluator supplying judgments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluatorId(Uuid);

impl EvaluatorId {
    /// Creates a new random EvaluatorId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an EvaluatorId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EvaluatorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EvaluatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EvaluatorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identity of one comparison matrix: the parent node whose children are
/// compared, and the evaluator who owns the judgments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatrixKey {
    pub parent_id: NodeId,
    pub evaluator_id: EvaluatorId,
}

impl MatrixKey {
    pub fn new(parent_id: NodeId, evaluator_id: EvaluatorId) -> Self {
        Self {
            parent_id,
            evaluator_id,
        }
    }
}

impl fmt::Display for MatrixKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.parent_id, self.evaluator_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_generates_unique_values() {
        assert_ne!(NodeId::new(), NodeId::new());
    }

    #[test]
    fn node_id_parses_from_string() {
        let id = NodeId::new();
        let parsed: NodeId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn evaluator_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<EvaluatorId>().is_err());
    }

    #[test]
    fn node_id_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&NodeId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn matrix_key_displays_parent_then_evaluator() {
        let parent = NodeId::new();
        let evaluator = EvaluatorId::new();
        let key = MatrixKey::new(parent, evaluator);
        assert_eq!(key.to_string(), format!("{}/{}", parent, evaluator));
    }
}
